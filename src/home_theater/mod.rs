//! Home-theater push notifications.
//!
//! `client.rs` holds the [`HomeTheaterPush`] seam and the HTTP implementation
//! used for Plex Home Theater.

mod client;

pub use client::{HomeTheaterPush, HttpHomeTheater, PushError, PushRequest, PushResult, PLEX_APP};
