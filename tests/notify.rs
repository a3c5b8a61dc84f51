//! Plex Home Theater event notifications.

mod common;

use common::{host_of, init_logging, RecordingPush};
use plex_notifier::{HttpHomeTheater, PlexConfig, PlexNotifier, PushResult, PLEX_APP};
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMMAND_PATH: &str = "/xbmcCmds/xbmcHttp/";

fn client_config(hosts: &str) -> PlexConfig {
  PlexConfig {
    use_plex_client: true,
    client_host: hosts.to_string(),
    notify_on_snatch: true,
    notify_on_download: true,
    notify_on_subtitle_download: true,
    notify_on_update: true,
    notify_on_login: true,
    ..PlexConfig::default()
  }
}

fn recording(config: PlexConfig) -> (PlexNotifier<PlexConfig, RecordingPush>, RecordingPush) {
  let push = RecordingPush::default();
  let notifier = PlexNotifier::with_push(config, push.clone()).unwrap();
  (notifier, push)
}

async fn notify_all(notifier: &PlexNotifier<PlexConfig, RecordingPush>) {
  notifier.notify_snatch("Show - S01E01", false).await;
  notifier.notify_download("Show - S01E01").await;
  notifier.notify_subtitle_download("Show - S01E01", "en").await;
  notifier.notify_git_update(Some("abc123")).await;
  notifier.notify_login("10.0.0.5").await;
}

#[tokio::test]
async fn test_disabled_event_flags_send_nothing() {
  init_logging();
  let config = PlexConfig {
    use_plex_client: true,
    client_host: "pht:3005".to_string(),
    ..PlexConfig::default()
  };
  let (notifier, push) = recording(config);

  notify_all(&notifier).await;
  assert_eq!(push.count(), 0);
}

#[tokio::test]
async fn test_client_notifier_off_sends_nothing() {
  init_logging();
  let config = PlexConfig {
    use_plex_client: false,
    ..client_config("pht:3005")
  };
  let (notifier, push) = recording(config);

  notify_all(&notifier).await;
  assert_eq!(push.count(), 0);
}

#[tokio::test]
async fn test_missing_client_host_sends_nothing() {
  init_logging();
  let (notifier, push) = recording(client_config(""));

  notify_all(&notifier).await;
  assert_eq!(push.count(), 0);
}

#[tokio::test]
async fn test_every_event_is_forwarded() {
  init_logging();
  let (notifier, push) = recording(client_config("pht:3005, den:3005"));

  notify_all(&notifier).await;
  let requests = push.requests.lock().clone();
  assert_eq!(requests.len(), 5);

  for request in &requests {
    assert_eq!(request.dest_app, PLEX_APP);
    assert_eq!(request.hosts, vec!["pht:3005", "den:3005"]);
  }

  assert_eq!(requests[0].title, "Started Download");
  assert_eq!(requests[0].message, "Show - S01E01");
  assert_eq!(requests[1].title, "Download Finished");
  assert_eq!(requests[2].title, "Subtitle Download Finished");
  assert_eq!(requests[2].message, "Show - S01E01: en");
  assert_eq!(requests[3].title, "Updated");
  assert_eq!(requests[3].message, "Updated To Commit#: abc123");
  assert_eq!(requests[4].title, "New login");
  assert_eq!(
    requests[4].message,
    "New login from IP: 10.0.0.5. http://geomaplookup.net/?ip=10.0.0.5"
  );
}

#[tokio::test]
async fn test_snatch_proper_title() {
  init_logging();
  let (notifier, push) = recording(client_config("pht:3005"));

  notifier.notify_snatch("Show - S01E02", true).await;
  assert_eq!(push.last().unwrap().title, "Started PROPER Download");
}

#[tokio::test]
async fn test_update_and_login_edge_cases() {
  init_logging();
  let (notifier, push) = recording(client_config("pht:3005"));

  notifier.notify_git_update(None).await;
  assert_eq!(push.last().unwrap().message, "Updated To Commit#: ??");

  notifier.notify_git_update(Some("")).await;
  notifier.notify_login("").await;
  assert_eq!(push.count(), 1);
}

#[tokio::test]
async fn test_credentials_come_from_config() {
  init_logging();
  let config = PlexConfig {
    client_username: "plex".to_string(),
    client_password: "pw".to_string(),
    ..client_config("pht:3005")
  };
  let (notifier, push) = recording(config);

  notifier.notify_download("Show - S01E01").await;
  let request = push.last().unwrap();
  assert_eq!(request.username.as_deref(), Some("plex"));
  assert_eq!(request.password.as_deref(), Some("pw"));
}

#[tokio::test]
async fn test_notify_pht_bypasses_enabled_flag() {
  init_logging();
  let (notifier, push) = recording(PlexConfig::default());

  let results = notifier
    .test_notify_pht(Some("living-room:3005"), Some("u"), Some("p"))
    .await;

  assert_eq!(
    results,
    vec![PushResult {
      host: "living-room:3005".to_string(),
      delivered: true
    }]
  );
  let request = push.last().unwrap();
  assert_eq!(request.title, "Test Notification");
  assert_eq!(request.username.as_deref(), Some("u"));
}

#[tokio::test]
async fn test_http_push_sends_notification_command() {
  init_logging();
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path(COMMAND_PATH))
    .and(query_param("command", "ExecBuiltIn"))
    .and(query_param(
      "parameter",
      "Notification(Download Finished,Show - S01E01)",
    ))
    .and(header_exists("authorization"))
    .respond_with(ResponseTemplate::new(200).set_body_string("<html><li>OK</html>"))
    .expect(1)
    .mount(&server)
    .await;

  let config = PlexConfig {
    client_username: "plex".to_string(),
    client_password: "pw".to_string(),
    ..client_config(&format!("{},127.0.0.1:1", host_of(&server)))
  };
  let notifier = PlexNotifier::new(config).unwrap();

  notifier.notify_download("Show - S01E01").await;
}

#[tokio::test]
async fn test_http_push_reports_each_host() {
  init_logging();
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path(COMMAND_PATH))
    .respond_with(ResponseTemplate::new(200))
    .expect(1)
    .mount(&server)
    .await;

  let host = host_of(&server);
  let notifier = PlexNotifier::with_push(PlexConfig::default(), HttpHomeTheater::new().unwrap())
    .unwrap();

  let results = notifier
    .test_notify_pht(Some(&format!("{}|127.0.0.1:1", host)), None, None)
    .await;

  assert_eq!(
    results,
    vec![
      PushResult {
        host,
        delivered: true
      },
      PushResult {
        host: "127.0.0.1:1".to_string(),
        delivered: false
      },
    ]
  );
}

#[tokio::test]
async fn test_http_push_disabled_makes_no_request() {
  init_logging();
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .respond_with(ResponseTemplate::new(200))
    .expect(0)
    .mount(&server)
    .await;

  let config = PlexConfig {
    use_plex_client: true,
    client_host: host_of(&server),
    ..PlexConfig::default()
  };
  let notifier = PlexNotifier::new(config).unwrap();

  notifier.notify_snatch("Show - S01E01", false).await;
  notifier.notify_download("Show - S01E01").await;
  notifier.notify_subtitle_download("Show - S01E01", "en").await;
  notifier.notify_git_update(Some("abc123")).await;
  notifier.notify_login("10.0.0.5").await;
}
