//! # Spotify Integration Module
//!
//! HTTP client for the two Spotify surfaces spotdump talks to:
//!
//! - the accounts token endpoint ([`auth`]): authorization-code exchange and
//!   refresh, authenticated with the client's Basic credentials
//! - the Web API resource endpoints ([`catalog`], [`me`]): read-only `GET`s
//!   authenticated with a bearer access token
//!
//! Every call returns the parsed JSON body on HTTP 200 and an error carrying
//! the status and body otherwise. Nothing here retries; token expiry is handled
//! one layer up by [`crate::management::CredentialBroker`].
//!
//! ```text
//! CLI commands
//!      ↓
//! CredentialBroker ── Login (browser + local callback server)
//!      ↓
//! SpotifyClient
//!      ↓
//! Spotify Web API / accounts service
//! ```

use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};
use serde_json::Value;

use crate::{Error, Res, config::Config};

pub mod auth;
pub mod catalog;
pub mod me;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the Spotify accounts and Web API endpoints.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: Url,
    token_url: String,
    auth_string: String,
    redirect_uri: String,
}

impl SpotifyClient {
    pub fn new(config: &Config) -> Res<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let api_url = Url::parse(&config.api_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| Error::Config(format!("SPOTIFY_API_URL `{}`", config.api_url)))?;
        Ok(Self {
            http,
            api_url,
            token_url: config.token_url.clone(),
            auth_string: config.auth_string.clone(),
            redirect_uri: config.redirect_uri.clone(),
        })
    }

    /// Issues an authenticated `GET` below the API base URL. Each segment is
    /// percent-encoded, so IDs cannot add path components or a query.
    async fn get_json(&self, token: &str, segments: &[&str], query: &[(&str, String)]) -> Res<Value> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("SPOTIFY_API_URL `{}`", self.api_url)))?
            .pop_if_empty()
            .extend(segments);
        log::debug!("GET {} {:?}", url, query);

        let res = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        handle_response(res).await
    }
}

/// Returns the JSON body of a 200 response; any other status is an
/// [`Error::Api`] carrying the status and the raw body.
async fn handle_response(res: Response) -> Res<Value> {
    let status = res.status();
    if status == StatusCode::OK {
        return Ok(res.json().await?);
    }

    let body = res.text().await.unwrap_or_default();
    Err(Error::Api {
        status: status.as_u16(),
        body,
    })
}
