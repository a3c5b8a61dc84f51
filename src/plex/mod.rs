//! Plex API client module.
//!
//! Handles plex.tv authentication, library section listing and section refresh.

mod auth;
mod client;
mod error;
mod sections;
mod types;

pub use auth::{
  AuthContext, CLIENT_IDENTIFIER_HEADER, DEVICE_NAME_HEADER, PRODUCT_HEADER, TOKEN_HEADER,
  VERSION_HEADER,
};
pub use client::{PlexClient, SIGN_IN_URL};
pub use error::{AuthError, PlexError};
pub use sections::{normalize_path, parse_sections, section_matches};
pub use types::*;
