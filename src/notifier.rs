//! Plex notifier - event notifications and library updates.

use tokio::sync::Mutex;

use crate::config::{split_hosts, ConfigProvider, PlexConfig};
use crate::home_theater::{HomeTheaterPush, HttpHomeTheater, PushRequest, PushResult, PLEX_APP};
use crate::plex::{
  section_matches, AuthContext, AuthError, FailedHosts, LibraryUpdate, PlexClient, PlexError,
  SectionHosts, UpdateRequest,
};

const TEST_TITLE: &str = "Test Notification";
const TEST_MESSAGE: &str = "This is a test notification from Plex Notifier";

/// Sends Plex Home Theater notifications and refreshes Plex Media Server libraries.
///
/// Holds the plex.tv token for its whole lifetime. Calls may come from
/// several tasks; token acquisition is serialized, everything else works on
/// a per-call config snapshot.
pub struct PlexNotifier<C, P = HttpHomeTheater> {
  config: C,
  push: P,
  client: PlexClient,
  auth_lock: Mutex<()>,
}

impl<C: ConfigProvider> PlexNotifier<C, HttpHomeTheater> {
  /// Create a notifier that pushes to Plex Home Theater over HTTP.
  pub fn new(config: C) -> Result<Self, PlexError> {
    let push = HttpHomeTheater::new()?;
    Self::with_push(config, push)
  }
}

impl<C: ConfigProvider, P: HomeTheaterPush> PlexNotifier<C, P> {
  /// Create a notifier with a custom push implementation.
  pub fn with_push(config: C, push: P) -> Result<Self, PlexError> {
    let identity = config.snapshot().identity();
    Ok(Self {
      config,
      push,
      client: PlexClient::new(&identity)?,
      auth_lock: Mutex::new(()),
    })
  }

  /// Sign in against a different account service.
  pub fn with_sign_in_url(mut self, url: impl Into<String>) -> Self {
    self.client.set_sign_in_url(url);
    self
  }

  /// Headers and token used for Plex Media Server requests.
  pub fn auth(&self) -> &AuthContext {
    self.client.auth()
  }

  pub fn push_client(&self) -> &P {
    &self.push
  }

  // ==========================================================================
  // Event notifications
  // ==========================================================================

  pub async fn notify_snatch(&self, ep_name: &str, is_proper: bool) {
    let config = self.config.snapshot();
    if config.notify_on_snatch {
      let title = config.messages.snatch_title(is_proper).to_string();
      self.notify_pht(&config, &title, ep_name, None, None, None, false).await;
    }
  }

  pub async fn notify_download(&self, ep_name: &str) {
    let config = self.config.snapshot();
    if config.notify_on_download {
      let title = config.messages.download.clone();
      self.notify_pht(&config, &title, ep_name, None, None, None, false).await;
    }
  }

  pub async fn notify_subtitle_download(&self, ep_name: &str, lang: &str) {
    let config = self.config.snapshot();
    if config.notify_on_subtitle_download {
      let title = config.messages.subtitle_download.clone();
      let message = format!("{}: {}", ep_name, lang);
      self.notify_pht(&config, &title, &message, None, None, None, false).await;
    }
  }

  /// Announce an application update. `None` reports the version as `??`.
  pub async fn notify_git_update(&self, new_version: Option<&str>) {
    let config = self.config.snapshot();
    if !config.notify_on_update {
      return;
    }
    let new_version = new_version.unwrap_or("??");
    let update_text = &config.messages.git_update_text;
    let title = &config.messages.git_update;
    if !update_text.is_empty() && !title.is_empty() && !new_version.is_empty() {
      let message = format!("{}{}", update_text, new_version);
      self.notify_pht(&config, title, &message, None, None, None, false).await;
    }
  }

  pub async fn notify_login(&self, ip_address: &str) {
    let config = self.config.snapshot();
    if !config.notify_on_login {
      return;
    }
    let title = &config.messages.login;
    if !config.messages.login_text.is_empty() && !title.is_empty() && !ip_address.is_empty() {
      let message = config.messages.login_message(ip_address);
      self.notify_pht(&config, title, &message, None, None, None, false).await;
    }
  }

  /// Send a test notification to Plex Home Theater, ignoring the enabled flags.
  pub async fn test_notify_pht(
    &self,
    host: Option<&str>,
    username: Option<&str>,
    password: Option<&str>,
  ) -> Vec<PushResult> {
    let config = self.config.snapshot();
    self
      .notify_pht(&config, TEST_TITLE, TEST_MESSAGE, host, username, password, true)
      .await
  }

  /// Check connectivity to Plex Media Server, ignoring the enabled flags.
  pub async fn test_notify_pms(
    &self,
    host: Option<&str>,
    username: Option<&str>,
    password: Option<&str>,
    token: Option<&str>,
  ) -> Result<LibraryUpdate, PlexError> {
    self
      .update_library(UpdateRequest {
        file_location: None,
        hosts: host.map(str::to_string),
        username: username.map(str::to_string),
        password: password.map(str::to_string),
        token: token.map(str::to_string),
        force: true,
      })
      .await
  }

  #[allow(clippy::too_many_arguments)]
  async fn notify_pht(
    &self,
    config: &PlexConfig,
    title: &str,
    message: &str,
    host: Option<&str>,
    username: Option<&str>,
    password: Option<&str>,
    force: bool,
  ) -> Vec<PushResult> {
    // Event flags may be on while the client notifier itself is off.
    if !config.use_plex_client && !force {
      return Vec::new();
    }

    let hosts = split_hosts(pick(host, &config.client_host).unwrap_or_default());
    if hosts.is_empty() {
      log::debug!("No Plex Home Theater host specified, check your settings");
      return Vec::new();
    }

    self
      .push
      .push(PushRequest {
        title: title.to_string(),
        message: message.to_string(),
        hosts,
        username: pick(username, &config.client_username).map(str::to_string),
        password: pick(password, &config.client_password).map(str::to_string),
        dest_app: PLEX_APP,
      })
      .await
  }

  // ==========================================================================
  // Authentication
  // ==========================================================================

  /// Make sure a plex.tv token is available.
  ///
  /// Returns `true` when a token is set, or when neither a token nor
  /// credentials are configured and no authentication is attempted.
  pub async fn get_token(
    &self,
    username: Option<&str>,
    password: Option<&str>,
    token: Option<&str>,
  ) -> bool {
    let config = self.config.snapshot();
    self.authenticate(&config, username, password, token).await.is_ok()
  }

  async fn authenticate(
    &self,
    config: &PlexConfig,
    username: Option<&str>,
    password: Option<&str>,
    token: Option<&str>,
  ) -> Result<Option<String>, AuthError> {
    let _guard = self.auth_lock.lock().await;
    let auth = self.client.auth();

    let username = pick(username, &config.server_username);
    let password = pick(password, &config.server_password);

    if let Some(token) = pick(token, &config.server_token) {
      if let Err(e) = auth.set_token(token) {
        auth.clear_token();
        log::debug!("Rejected configured Plex token: {}", e);
        return Err(e);
      }
    }

    if auth.has_token() {
      return Ok(auth.current_token());
    }

    let (Some(username), Some(password)) = (username, password) else {
      return Ok(None);
    };

    let result = match self.client.sign_in(username, password).await {
      Ok(token) => auth.set_token(&token).map(|()| token),
      Err(e) => Err(e),
    };

    match result {
      Ok(token) => Ok(Some(token)),
      Err(e) => {
        auth.clear_token();
        log::debug!(
          "Error fetching credentials from plex.tv for user {}: {}",
          username,
          e
        );
        Err(e)
      }
    }
  }

  // ==========================================================================
  // Library update
  // ==========================================================================

  /// Refresh Plex Media Server TV sections after a download.
  ///
  /// Only sections whose root path contains `file_location` are refreshed;
  /// when none match, every TV section on every host is. With `force` the
  /// enabled checks are skipped and the call stops after listing sections.
  pub async fn update_library(&self, request: UpdateRequest) -> Result<LibraryUpdate, PlexError> {
    let config = self.config.snapshot();

    if !(config.use_plex_server && config.update_library) && !request.force {
      return Ok(LibraryUpdate::Disabled);
    }

    let hosts = split_hosts(pick(request.hosts.as_deref(), &config.server_host).unwrap_or_default());
    if hosts.is_empty() {
      log::debug!("No Plex Media Server host specified, check your settings");
      return Err(PlexError::NoHosts);
    }

    if let Err(e) = self
      .authenticate(
        &config,
        request.username.as_deref(),
        request.password.as_deref(),
        request.token.as_deref(),
      )
      .await
    {
      log::warn!("Error getting auth token for Plex Media Server, check your settings");
      return Err(e.into());
    }

    let file_location = request.file_location.as_deref().unwrap_or_default();
    let scheme = if config.server_https { "https" } else { "http" };

    let mut all_hosts = SectionHosts::new();
    let mut matching_hosts = SectionHosts::new();
    let mut failed_hosts = FailedHosts::new();

    for host in &hosts {
      let base_url = format!("{}://{}", scheme, host);

      let sections = match self.client.list_sections(&base_url, host).await {
        Ok(sections) => sections,
        Err(e) => {
          match &e {
            PlexError::Unauthorized(_) => log::warn!(
              "Unauthorized by {}. Please set a token or username and password in Plex settings",
              host
            ),
            PlexError::NoSections(_) => log::debug!("{}", e),
            _ => log::warn!("Error while trying to contact Plex Media Server {}: {}", host, e),
          }
          failed_hosts.insert(host);
          continue;
        }
      };

      for section in sections.iter().filter(|s| s.is_show()) {
        let Some(key) = section.key.as_deref() else {
          log::debug!("Skipping TV section without a key on {}", host);
          continue;
        };
        all_hosts.insert(key, host);

        if file_location.is_empty() {
          continue;
        }
        if section
          .locations
          .iter()
          .any(|path| section_matches(path, file_location))
        {
          matching_hosts.insert(key, host);
        }
      }
    }

    if request.force {
      return Ok(LibraryUpdate::Probed { failed_hosts });
    }

    let targets = if !matching_hosts.is_empty() {
      log::debug!(
        "Updating hosts where TV section paths match the downloaded show: {}",
        matching_hosts.hosts().join(", ")
      );
      matching_hosts
    } else {
      log::debug!(
        "Updating all hosts with TV sections: {}",
        all_hosts.hosts().join(", ")
      );
      all_hosts
    };

    for target in targets.iter() {
      let base_url = format!("{}://{}", scheme, target.host);
      if let Err(e) = self.client.refresh_section(&base_url, &target.key).await {
        log::warn!(
          "Error updating library section {} on Plex Media Server {}: {}",
          target.key,
          target.host,
          e
        );
        failed_hosts.insert(&target.host);
      }
    }

    Ok(LibraryUpdate::Refreshed {
      sections: targets.into_targets(),
      failed_hosts,
    })
  }
}

/// The argument if non-empty, else the configured value if non-empty.
fn pick<'a>(arg: Option<&'a str>, configured: &'a str) -> Option<&'a str> {
  arg
    .filter(|s| !s.is_empty())
    .or(Some(configured))
    .filter(|s| !s.is_empty())
}
