//! Plex Home Theater notifications and Plex Media Server library refresh.
//!
//! [`PlexNotifier`] pushes download, snatch, subtitle, update and login events
//! to Plex Home Theater clients and, after a download, asks Plex Media Server
//! to rescan the TV sections whose root directory holds the new file.

mod config;
mod home_theater;
mod messages;
mod notifier;
pub mod plex;

pub use config::{split_hosts, ConfigError, ConfigProvider, PlexConfig, SharedConfig};
pub use home_theater::{HomeTheaterPush, HttpHomeTheater, PushError, PushRequest, PushResult, PLEX_APP};
pub use messages::NotifyStrings;
pub use notifier::PlexNotifier;
pub use plex::{AuthError, LibraryUpdate, PlexError, SectionTarget, UpdateRequest};
