//! HTTP command client for Plex Home Theater.

use std::future::Future;

use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

/// Destination application name for Plex Home Theater.
pub const PLEX_APP: &str = "PLEX";

#[derive(Error, Debug)]
pub enum PushError {
  #[error("HTTP request failed: {0}")]
  Http(#[from] reqwest::Error),
  #[error("HTTP {0}")]
  Status(reqwest::StatusCode),
}

/// A notification to show on one or more home-theater clients.
#[derive(Debug, Clone)]
pub struct PushRequest {
  pub title: String,
  pub message: String,
  pub hosts: Vec<String>,
  pub username: Option<String>,
  pub password: Option<String>,
  /// Application the hosts run, e.g. [`PLEX_APP`].
  pub dest_app: &'static str,
}

/// Delivery result for one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushResult {
  pub host: String,
  pub delivered: bool,
}

/// Sends notifications to home-theater clients.
///
/// Implementations never fail as a whole; per-host failures are reported in
/// the returned results.
pub trait HomeTheaterPush: Send + Sync {
  fn push(&self, request: PushRequest) -> impl Future<Output = Vec<PushResult>> + Send;
}

/// Pushes through the legacy `xbmcHttp` command API that Plex Home Theater exposes.
#[derive(Debug, Clone)]
pub struct HttpHomeTheater {
  http: Client,
}

impl HttpHomeTheater {
  pub fn new() -> Result<Self, reqwest::Error> {
    Ok(Self {
      http: Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?,
    })
  }

  /// Show `Notification(title,message)` on a single host.
  pub async fn send(
    &self,
    host: &str,
    title: &str,
    message: &str,
    username: Option<&str>,
    password: Option<&str>,
  ) -> Result<(), PushError> {
    let url = format!("http://{}/xbmcCmds/xbmcHttp/", host);
    let parameter = format!("Notification({},{})", title, message);

    let mut request = self
      .http
      .get(&url)
      .query(&[("command", "ExecBuiltIn"), ("parameter", parameter.as_str())]);
    if let (Some(username), Some(password)) = (username, password) {
      request = request.basic_auth(username, Some(password));
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
      return Err(PushError::Status(status));
    }
    Ok(())
  }
}

impl HomeTheaterPush for HttpHomeTheater {
  async fn push(&self, request: PushRequest) -> Vec<PushResult> {
    let mut results = Vec::with_capacity(request.hosts.len());

    for host in &request.hosts {
      log::debug!(
        "Sending {} notification to {}: {}",
        request.dest_app,
        host,
        request.message
      );

      let delivered = match self
        .send(
          host,
          &request.title,
          &request.message,
          request.username.as_deref(),
          request.password.as_deref(),
        )
        .await
      {
        Ok(()) => true,
        Err(e) => {
          log::warn!("Failed to notify {} host {}: {}", request.dest_app, host, e);
          false
        }
      };

      results.push(PushResult {
        host: host.clone(),
        delivered,
      });
    }

    results
  }
}
