//! Plex API types.

use serde::{Deserialize, Serialize};

/// Values sent in the four `X-Plex-*` identity headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientIdentity {
  pub device_name: String,
  pub product: String,
  pub client_identifier: String,
  pub version: String,
}

/// Library section as reported by `/library/sections`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Section {
  /// Section type (`show`, `movie`, `artist`, ...).
  pub kind: Option<String>,
  pub key: Option<String>,
  /// Root directories scanned by this section.
  pub locations: Vec<String>,
}

impl Section {
  pub fn is_show(&self) -> bool {
    self.kind.as_deref() == Some("show")
  }
}

/// Sign-in response from plex.tv. Only the token is read.
#[derive(Debug, Clone, Deserialize)]
pub struct SignInResponse {
  pub user: SignInUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignInUser {
  pub authentication_token: String,
}

/// A section selected for refresh and the host that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionTarget {
  pub key: String,
  pub host: String,
}

/// Section key to owning host, in first-seen order.
///
/// Keys are the index: recording a key that is already present replaces its
/// host but keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionHosts {
  entries: Vec<SectionTarget>,
}

impl SectionHosts {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, key: &str, host: &str) {
    match self.entries.iter_mut().find(|e| e.key == key) {
      Some(entry) => entry.host = host.to_string(),
      None => self.entries.push(SectionTarget {
        key: key.to_string(),
        host: host.to_string(),
      }),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn iter(&self) -> impl Iterator<Item = &SectionTarget> {
    self.entries.iter()
  }

  /// Distinct hosts, in order of first appearance.
  pub fn hosts(&self) -> Vec<&str> {
    let mut hosts: Vec<&str> = Vec::new();
    for entry in &self.entries {
      if !hosts.contains(&entry.host.as_str()) {
        hosts.push(&entry.host);
      }
    }
    hosts
  }

  pub fn into_targets(self) -> Vec<SectionTarget> {
    self.entries
  }
}

/// Hosts that failed during one update call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FailedHosts(Vec<String>);

impl FailedHosts {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, host: &str) {
    if !self.0.iter().any(|h| h == host) {
      self.0.push(host.to_string());
    }
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn contains(&self, host: &str) -> bool {
    self.0.iter().any(|h| h == host)
  }

  pub fn as_slice(&self) -> &[String] {
    &self.0
  }

  /// Comma-joined host list, or `None` when nothing failed.
  pub fn joined(&self) -> Option<String> {
    if self.0.is_empty() {
      None
    } else {
      Some(self.0.join(", "))
    }
  }
}

/// Result of [`update_library`](crate::PlexNotifier::update_library).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LibraryUpdate {
  /// Server updates are turned off and the call was not forced.
  Disabled,
  /// Forced connectivity check: sections were listed but nothing refreshed.
  Probed { failed_hosts: FailedHosts },
  /// Refresh requests were issued for `sections`.
  Refreshed {
    sections: Vec<SectionTarget>,
    failed_hosts: FailedHosts,
  },
}

impl LibraryUpdate {
  /// Comma-joined failed hosts, or `None` if nothing failed.
  pub fn failed_hosts(&self) -> Option<String> {
    match self {
      LibraryUpdate::Disabled => None,
      LibraryUpdate::Probed { failed_hosts } => failed_hosts.joined(),
      LibraryUpdate::Refreshed { failed_hosts, .. } => failed_hosts.joined(),
    }
  }

  /// Sections a refresh was requested for.
  pub fn refreshed(&self) -> &[SectionTarget] {
    match self {
      LibraryUpdate::Refreshed { sections, .. } => sections,
      _ => &[],
    }
  }
}

/// Arguments to a library update. Unset values fall back to configuration.
#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
  /// Location of the file that just landed on disk.
  pub file_location: Option<String>,
  /// One or more server hosts, separated by `,` or `|`.
  pub hosts: Option<String>,
  pub username: Option<String>,
  pub password: Option<String>,
  pub token: Option<String>,
  /// Skip the enabled checks and stop after listing sections.
  pub force: bool,
}

impl UpdateRequest {
  /// Update triggered by a downloaded episode at `location`.
  pub fn for_location(location: impl Into<String>) -> Self {
    Self {
      file_location: Some(location.into()),
      ..Self::default()
    }
  }
}
