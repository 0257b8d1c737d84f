//! # CLI Module
//!
//! Command implementations behind the `spotdump` subcommands. Each resource
//! command receives a [`Context`] built once per invocation: the HTTP client,
//! the resolved access token and the output settings. Nothing here keeps
//! session state between calls.
//!
//! ## Commands
//!
//! - [`auth`] - run, force or check the login/token lifecycle
//! - [`get_top`] - the user's top artists or tracks
//! - [`get_recently_played`] - listening history around a timestamp
//! - [`analyze_track`] - audio analysis for one track or an ID file
//! - [`get_artists`], [`get_tracks`] - catalog lookups for one or more IDs
//! - [`get_audio_features`] - audio features for IDs or an ID file
//!
//! ## Usage Patterns
//!
//! ```bash
//! spotdump auth                                   # log in once
//! spotdump get-top tracks --limit 50 -o top.json
//! spotdump get-recently-played after 2024-01-01 --trim -o -
//! spotdump analyze-track - --file ids.txt -o analyses/
//! ```

use serde_json::Value;

use crate::{
    Res,
    config::Config,
    management::{CredentialBroker, TokenStore},
    spotify::{SpotifyClient, auth::BrowserLogin},
    utils::{self, OutputTarget},
};

mod analysis;
mod auth;
mod lookup;
mod recent;
mod top;

pub use analysis::analyze_track;
pub use auth::auth;
pub use lookup::get_artists;
pub use lookup::get_audio_features;
pub use lookup::get_tracks;
pub use recent::get_recently_played;
pub use top::get_top;

/// Everything a resource command needs, resolved once at startup.
pub struct Context {
    pub client: SpotifyClient,
    pub access_token: String,
    pub output: OutputTarget,
    pub trim: bool,
}

impl Context {
    pub fn new(client: SpotifyClient, access_token: String, output: OutputTarget, trim: bool) -> Self {
        Self {
            client,
            access_token,
            output,
            trim,
        }
    }

    /// Resolves a valid access token through the browser login flow and the
    /// on-disk token store, then builds the context.
    pub async fn resolve(config: &Config, output: OutputTarget, trim: bool) -> Res<Self> {
        let store = TokenStore::new(&config.app_dir);
        let client = SpotifyClient::new(config)?;
        let token = CredentialBroker::new(config, &store, &client, BrowserLogin::default())
            .resolve_access_token(false)
            .await?;

        Ok(Self::new(client, token.access_token, output, trim))
    }

    /// Writes a payload to the configured output.
    pub async fn emit(&self, data: Value) -> Res<()> {
        self.emit_to(data, &self.output).await
    }

    /// Writes a payload to `target`, trimming it first when `--trim` is set.
    pub async fn emit_to(&self, data: Value, target: &OutputTarget) -> Res<()> {
        let data = if self.trim {
            utils::trim_items(data)?
        } else {
            data
        };
        utils::write_output(&data, target).await
    }
}
