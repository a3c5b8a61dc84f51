//! Identity headers and the cached plex.tv token.

use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::error::{AuthError, PlexError};
use super::types::ClientIdentity;

pub const DEVICE_NAME_HEADER: &str = "X-Plex-Device-Name";
pub const PRODUCT_HEADER: &str = "X-Plex-Product";
pub const CLIENT_IDENTIFIER_HEADER: &str = "X-Plex-Client-Identifier";
pub const VERSION_HEADER: &str = "X-Plex-Version";
pub const TOKEN_HEADER: &str = "X-Plex-Token";

/// Request headers shared by every Plex call made through one notifier.
///
/// The four identity headers are fixed at construction. The token is the
/// only mutable part and is guarded so callers on different tasks see a
/// consistent value.
#[derive(Debug)]
pub struct AuthContext {
  identity: HeaderMap,
  token: RwLock<Option<HeaderValue>>,
}

impl AuthContext {
  /// Build the context, rejecting identity values that cannot be sent as headers.
  pub fn new(identity: &ClientIdentity) -> Result<Self, PlexError> {
    let mut headers = HeaderMap::new();
    for (name, value) in [
      (DEVICE_NAME_HEADER, &identity.device_name),
      (PRODUCT_HEADER, &identity.product),
      (CLIENT_IDENTIFIER_HEADER, &identity.client_identifier),
      (VERSION_HEADER, &identity.version),
    ] {
      let value = HeaderValue::from_str(value).map_err(|_| PlexError::InvalidHeader(name))?;
      let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| PlexError::InvalidHeader(name))?;
      headers.insert(name, value);
    }

    Ok(Self {
      identity: headers,
      token: RwLock::new(None),
    })
  }

  /// Current token, if one has been set.
  pub fn current_token(&self) -> Option<String> {
    self
      .token
      .read()
      .as_ref()
      .and_then(|v| v.to_str().ok())
      .map(str::to_string)
  }

  pub fn has_token(&self) -> bool {
    self.token.read().is_some()
  }

  /// Install a token. Values that are not valid header text are refused and
  /// leave the previous token untouched.
  pub fn set_token(&self, token: &str) -> Result<(), AuthError> {
    let mut value = HeaderValue::from_str(token).map_err(|_| AuthError::InvalidToken)?;
    value.set_sensitive(true);
    *self.token.write() = Some(value);
    Ok(())
  }

  /// Remove the token. Idempotent.
  pub fn clear_token(&self) {
    *self.token.write() = None;
  }

  /// Snapshot of the headers to attach to a request.
  pub fn headers(&self) -> HeaderMap {
    let mut headers = self.identity.clone();
    if let Some(token) = self.token.read().clone() {
      headers.insert(HeaderName::from_static("x-plex-token"), token);
    }
    headers
  }
}
