//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use plex_notifier::{HomeTheaterPush, PlexConfig, PushRequest, PushResult};
use wiremock::MockServer;

pub fn init_logging() {
  let _ = env_logger::builder().is_test(true).try_init();
}

/// Push implementation that records requests instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct RecordingPush {
  pub requests: Arc<Mutex<Vec<PushRequest>>>,
}

impl RecordingPush {
  pub fn count(&self) -> usize {
    self.requests.lock().len()
  }

  pub fn last(&self) -> Option<PushRequest> {
    self.requests.lock().last().cloned()
  }
}

impl HomeTheaterPush for RecordingPush {
  async fn push(&self, request: PushRequest) -> Vec<PushResult> {
    let results = request
      .hosts
      .iter()
      .map(|host| PushResult {
        host: host.clone(),
        delivered: true,
      })
      .collect();
    self.requests.lock().push(request);
    results
  }
}

/// Config with server updates enabled for `hosts`.
pub fn server_config(hosts: &str) -> PlexConfig {
  PlexConfig {
    use_plex_server: true,
    update_library: true,
    server_host: hosts.to_string(),
    client_identifier: "plex-notifier-test".to_string(),
    ..PlexConfig::default()
  }
}

/// `host:port` of a mock server, as it would appear in the config.
pub fn host_of(server: &MockServer) -> String {
  server.address().to_string()
}

/// One `Directory` element with a `Location` per path.
pub fn dir(key: &str, kind: &str, paths: &[&str]) -> String {
  let mut xml = format!(r#"<Directory key="{}" type="{}" title="Section {}">"#, key, kind, key);
  for (i, path) in paths.iter().enumerate() {
    xml.push_str(&format!(r#"<Location id="{}" path="{}" />"#, i, path));
  }
  xml.push_str("</Directory>");
  xml
}

/// A `MediaContainer` body holding `directories`.
pub fn sections_xml(directories: &[String]) -> String {
  format!(
    r#"<?xml version="1.0" encoding="UTF-8"?><MediaContainer size="{}">{}</MediaContainer>"#,
    directories.len(),
    directories.concat()
  )
}
