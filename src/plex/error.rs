//! Plex error types.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to a Plex Media Server.
#[derive(Debug, Error)]
pub enum PlexError {
  #[error("HTTP request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("Unauthorized by {0}, set a token or username and password")]
  Unauthorized(String),

  #[error("HTTP {status} from {host}")]
  Status { host: String, status: StatusCode },

  #[error("Empty response from {0}")]
  EmptyResponse(String),

  #[error("XML parse error: {0}")]
  Xml(#[from] quick_xml::Error),

  #[error("Plex Media Server not running on {0}")]
  NoSections(String),

  #[error("No Plex Media Server host specified")]
  NoHosts,

  #[error("Invalid header value for {0}")]
  InvalidHeader(&'static str),

  #[error("Authentication failed: {0}")]
  Auth(#[from] AuthError),
}

/// Reasons a plex.tv sign-in can fail.
#[derive(Debug, Error)]
pub enum AuthError {
  #[error("sign-in request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("sign-in rejected with HTTP {0}")]
  Rejected(StatusCode),

  #[error("malformed sign-in response: {0}")]
  MalformedResponse(#[from] serde_json::Error),

  #[error("token is not a valid header value")]
  InvalidToken,
}
