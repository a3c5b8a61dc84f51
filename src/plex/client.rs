//! Plex HTTP client for plex.tv sign-in and Plex Media Server library calls.

use reqwest::{Client, StatusCode};

use super::auth::AuthContext;
use super::error::{AuthError, PlexError};
use super::sections::parse_sections;
use super::types::*;

/// plex.tv endpoint that exchanges credentials for a token.
pub const SIGN_IN_URL: &str = "https://plex.tv/users/sign_in.json";

/// Plex HTTP API client.
#[derive(Debug)]
pub struct PlexClient {
  http: Client,
  auth: AuthContext,
  sign_in_url: String,
}

impl PlexClient {
  /// Create a client that identifies itself with `identity`.
  pub fn new(identity: &ClientIdentity) -> Result<Self, PlexError> {
    let http = Client::builder()
      .timeout(std::time::Duration::from_secs(30))
      .build()?;

    Ok(Self {
      http,
      auth: AuthContext::new(identity)?,
      sign_in_url: SIGN_IN_URL.to_string(),
    })
  }

  /// Use a different sign-in endpoint.
  pub fn set_sign_in_url(&mut self, url: impl Into<String>) {
    self.sign_in_url = url.into();
  }

  pub fn auth(&self) -> &AuthContext {
    &self.auth
  }

  /// Exchange username and password for a plex.tv token.
  pub async fn sign_in(&self, username: &str, password: &str) -> Result<String, AuthError> {
    log::debug!("Fetching plex.tv credentials for user: {}", username);

    let params = [("user[login]", username), ("user[password]", password)];

    let response = self
      .http
      .post(&self.sign_in_url)
      .headers(self.auth.headers())
      .form(&params)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      return Err(AuthError::Rejected(status));
    }

    let body = response.text().await?;
    let parsed: SignInResponse = serde_json::from_str(&body)?;
    Ok(parsed.user.authentication_token)
  }

  /// List the library sections of the server at `base_url`.
  pub async fn list_sections(&self, base_url: &str, host: &str) -> Result<Vec<Section>, PlexError> {
    let url = format!("{}/library/sections", base_url);

    let response = self
      .http
      .get(&url)
      .headers(self.auth.headers())
      .send()
      .await?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
      return Err(PlexError::Unauthorized(host.to_string()));
    }
    if !status.is_success() {
      return Err(PlexError::Status {
        host: host.to_string(),
        status,
      });
    }

    let body = response.text().await?;
    if body.is_empty() {
      return Err(PlexError::EmptyResponse(host.to_string()));
    }

    let sections = parse_sections(&body)?;
    if sections.is_empty() {
      return Err(PlexError::NoSections(host.to_string()));
    }

    log::debug!("Found {} library sections on {}", sections.len(), host);
    Ok(sections)
  }

  /// Ask the server at `base_url` to rescan section `key`.
  ///
  /// Only a transport failure is an error; the response status is not checked.
  pub async fn refresh_section(&self, base_url: &str, key: &str) -> Result<(), PlexError> {
    let url = format!("{}/library/sections/{}/refresh", base_url, key);

    let response = self
      .http
      .get(&url)
      .headers(self.auth.headers())
      .send()
      .await?;

    if !response.status().is_success() {
      log::debug!("Refresh of section {} returned HTTP {}", key, response.status());
    }

    Ok(())
  }
}
