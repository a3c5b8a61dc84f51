//! Notification titles and message templates.

use serde::{Deserialize, Serialize};

/// Text used for each kind of notification.
///
/// `login_text` may contain `{0}`, replaced by the client IP address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotifyStrings {
  pub snatch: String,
  pub snatch_proper: String,
  pub download: String,
  pub subtitle_download: String,
  pub git_update: String,
  pub git_update_text: String,
  pub login: String,
  pub login_text: String,
}

impl Default for NotifyStrings {
  fn default() -> Self {
    Self {
      snatch: "Started Download".to_string(),
      snatch_proper: "Started PROPER Download".to_string(),
      download: "Download Finished".to_string(),
      subtitle_download: "Subtitle Download Finished".to_string(),
      git_update: "Updated".to_string(),
      git_update_text: "Updated To Commit#: ".to_string(),
      login: "New login".to_string(),
      login_text: "New login from IP: {0}. http://geomaplookup.net/?ip={0}".to_string(),
    }
  }
}

impl NotifyStrings {
  pub fn snatch_title(&self, is_proper: bool) -> &str {
    if is_proper {
      &self.snatch_proper
    } else {
      &self.snatch
    }
  }

  pub fn login_message(&self, ip_address: &str) -> String {
    self.login_text.replace("{0}", ip_address)
  }
}
