//! Notifier configuration with persistence.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::messages::NotifyStrings;
use crate::plex::ClientIdentity;

const CONFIG_DIR: &str = "plex-notifier";
const CONFIG_FILE: &str = "config.json";
const CLIENT_ID_PREFIX: &str = "plex-notifier-";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Failed to access config file: {0}")]
  Io(#[from] std::io::Error),

  #[error("Invalid config file: {0}")]
  Json(#[from] serde_json::Error),

  #[error("Invalid config: {0}")]
  Invalid(String),
}

/// Notifier configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlexConfig {
  /// Push notifications to Plex Home Theater clients.
  #[serde(default)]
  pub use_plex_client: bool,

  /// Plex Home Theater host(s), `host:port`, separated by `,` or `|`.
  #[serde(default)]
  pub client_host: String,

  #[serde(default)]
  pub client_username: String,

  #[serde(default)]
  pub client_password: String,

  #[serde(default)]
  pub notify_on_snatch: bool,

  #[serde(default)]
  pub notify_on_download: bool,

  #[serde(default)]
  pub notify_on_subtitle_download: bool,

  #[serde(default)]
  pub notify_on_update: bool,

  #[serde(default)]
  pub notify_on_login: bool,

  /// Talk to Plex Media Server at all.
  #[serde(default)]
  pub use_plex_server: bool,

  /// Refresh library sections after a download.
  #[serde(default)]
  pub update_library: bool,

  /// Plex Media Server host(s), `host:port`, separated by `,` or `|`.
  #[serde(default)]
  pub server_host: String,

  #[serde(default)]
  pub server_username: String,

  #[serde(default)]
  pub server_password: String,

  /// Token used instead of signing in with username and password.
  #[serde(default)]
  pub server_token: String,

  #[serde(default)]
  pub server_https: bool,

  /// Name shown for this client in Plex.
  #[serde(default = "default_device_name")]
  pub device_name: String,

  #[serde(default = "default_product")]
  pub product: String,

  /// Stable identifier sent as `X-Plex-Client-Identifier`.
  #[serde(default = "default_client_identifier")]
  pub client_identifier: String,

  #[serde(default)]
  pub messages: NotifyStrings,
}

fn default_device_name() -> String {
  "Plex Notifier".to_string()
}

fn default_product() -> String {
  "Plex Notifier".to_string()
}

fn default_client_identifier() -> String {
  format!("{}{}", CLIENT_ID_PREFIX, Uuid::new_v4())
}

impl Default for PlexConfig {
  fn default() -> Self {
    Self {
      use_plex_client: false,
      client_host: String::new(),
      client_username: String::new(),
      client_password: String::new(),
      notify_on_snatch: false,
      notify_on_download: false,
      notify_on_subtitle_download: false,
      notify_on_update: false,
      notify_on_login: false,
      use_plex_server: false,
      update_library: false,
      server_host: String::new(),
      server_username: String::new(),
      server_password: String::new(),
      server_token: String::new(),
      server_https: false,
      device_name: default_device_name(),
      product: default_product(),
      client_identifier: default_client_identifier(),
      messages: NotifyStrings::default(),
    }
  }
}

impl PlexConfig {
  /// Validate configuration values.
  pub fn validate(&self) -> Result<(), String> {
    if self.device_name.trim().is_empty() {
      return Err("Device name cannot be empty".to_string());
    }
    if self.product.trim().is_empty() {
      return Err("Product name cannot be empty".to_string());
    }
    if self.client_identifier.trim().is_empty() {
      return Err("Client identifier cannot be empty".to_string());
    }
    for host in split_hosts(&self.server_host) {
      if host.contains("://") {
        return Err(format!("Server host '{}' must not include a scheme", host));
      }
    }
    for host in split_hosts(&self.client_host) {
      if host.contains("://") {
        return Err(format!("Client host '{}' must not include a scheme", host));
      }
    }
    Ok(())
  }

  /// Identity headers derived from this configuration.
  pub fn identity(&self) -> ClientIdentity {
    ClientIdentity {
      device_name: self.device_name.clone(),
      product: self.product.clone(),
      client_identifier: self.client_identifier.clone(),
      version: env!("CARGO_PKG_VERSION").to_string(),
    }
  }

  /// Default location, `<config dir>/plex-notifier/config.json`.
  pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
  }

  /// Load and validate a config file.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    let config: PlexConfig = serde_json::from_str(&text)?;
    config.validate().map_err(ConfigError::Invalid)?;
    Ok(config)
  }

  /// Load a config file, falling back to defaults when it is missing or unreadable.
  pub fn load_or_default(path: &Path) -> Self {
    match Self::load(path) {
      Ok(config) => {
        log::info!("Loaded config from {}", path.display());
        config
      }
      Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
        log::info!("No config at {}, using defaults", path.display());
        Self::default()
      }
      Err(e) => {
        log::warn!("Failed to load config from {}: {}", path.display(), e);
        Self::default()
      }
    }
  }

  /// Write the config as pretty JSON, creating parent directories.
  pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    let text = serde_json::to_string_pretty(self)?;
    std::fs::write(path, text)?;
    Ok(())
  }
}

/// Split a `,` or `|` separated host list, dropping blank entries.
pub fn split_hosts(hosts: &str) -> Vec<String> {
  hosts
    .split([',', '|'])
    .map(str::trim)
    .filter(|h| !h.is_empty())
    .map(str::to_string)
    .collect()
}

/// Source of configuration for the notifier.
///
/// Each public notifier call takes one snapshot up front and works from it,
/// so changes made while a call is running apply to the next call.
pub trait ConfigProvider: Send + Sync {
  fn snapshot(&self) -> PlexConfig;
}

impl ConfigProvider for PlexConfig {
  fn snapshot(&self) -> PlexConfig {
    self.clone()
  }
}

/// Configuration shared with the rest of the application and editable at runtime.
#[derive(Debug, Clone, Default)]
pub struct SharedConfig(pub Arc<RwLock<PlexConfig>>);

impl SharedConfig {
  pub fn new(config: PlexConfig) -> Self {
    Self(Arc::new(RwLock::new(config)))
  }

  /// Replace the whole configuration.
  pub fn replace(&self, config: PlexConfig) {
    *self.0.write() = config;
  }

  /// Edit the configuration in place.
  pub fn update(&self, f: impl FnOnce(&mut PlexConfig)) {
    f(&mut self.0.write());
  }
}

impl ConfigProvider for SharedConfig {
  fn snapshot(&self) -> PlexConfig {
    self.0.read().clone()
  }
}
