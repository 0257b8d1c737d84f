//! # API Module
//!
//! HTTP handlers for the local server that receives Spotify's OAuth redirect.
//!
//! - [`callback`] - captures the authorization code (or the error) sent to the
//!   configured redirect URI and hands it to the waiting login.
//!
//! The handler is mounted by [`crate::server::start_api_server`] only for the
//! duration of an interactive login.

mod callback;

pub use callback::callback;
