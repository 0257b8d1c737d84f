//! Configuration management for spotdump.
//!
//! Configuration is read once at startup into an explicit [`Config`] value that
//! is passed to everything that needs it. Sources, highest priority first:
//! 1. Process environment variables
//! 2. `.env` in the current working directory
//! 3. `.env` in the application config directory
//! 4. Built-in defaults for the Spotify endpoints

use std::{
    env,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::Url;

use crate::{Error, Res};

pub const APP_NAME: &str = "spotdump";

/// Permissions requested at login. Stored authorization records are reused
/// only while their scope equals this string exactly.
pub const REQUIRED_SCOPE: &str = "user-read-recently-played user-top-read user-library-read playlist-read-collaborative playlist-read-private user-follow-read";

pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Runtime configuration for a single invocation.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    /// Base64 of `client_id:client_secret`, sent as HTTP Basic credentials.
    pub auth_string: String,
    pub redirect_uri: String,
    pub username: String,
    pub password: String,
    pub scope: String,
    pub server_addr: SocketAddr,
    /// Path of the redirect URI, served by the callback server.
    pub callback_path: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    /// Directory holding `auth.json` and `token_info.json`.
    pub app_dir: PathBuf,
}

impl Config {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Res<Self> {
        Self::from_lookup(|key| env::var(key).ok().filter(|v| !v.is_empty()))
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingConfig`] naming the first required variable
    /// that is absent, or [`Error::Config`] when the redirect URI or server
    /// address cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Res<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| lookup(key).ok_or(Error::MissingConfig(key));

        let client_id = require("SPOTIFY_CLIENT_ID")?;
        let auth_string = match lookup("SPOTIFY_AUTH_STRING") {
            Some(s) => s,
            None => {
                let secret = require("SPOTIFY_CLIENT_SECRET")?;
                basic_auth_string(&client_id, &secret)
            }
        };
        let redirect_uri = require("SPOTIFY_REDIRECT_URI")?;
        let username = require("SPOTIFY_USERNAME")?;
        let password = require("SPOTIFY_PASSWORD")?;

        let server_addr = match lookup("SERVER_ADDRESS") {
            Some(addr) => addr
                .parse::<SocketAddr>()
                .map_err(|e| Error::Config(format!("SERVER_ADDRESS `{}`: {}", addr, e)))?,
            None => callback_addr(&redirect_uri)?,
        };

        let callback_path = callback_path(&redirect_uri)?;

        let app_dir = lookup("SPOTDUMP_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(default_app_dir);

        Ok(Self {
            client_id,
            auth_string,
            redirect_uri,
            username,
            password,
            scope: REQUIRED_SCOPE.to_string(),
            server_addr,
            callback_path,
            auth_url: lookup("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.into()),
            token_url: lookup("SPOTIFY_API_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.into()),
            api_url: lookup("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()),
            app_dir,
        })
    }
}

/// Loads `.env` files into the process environment.
///
/// The working directory's `.env` is loaded before the one in the platform
/// config directory, so it takes priority. Existing environment variables are
/// never overwritten and a missing file is not an error.
///
/// # Directory Structure
///
/// - Linux: `~/.config/spotdump/.env`
/// - macOS: `~/Library/Application Support/spotdump/.env`
/// - Windows: `%APPDATA%/spotdump/.env`
pub async fn load_env() -> Res<()> {
    let app_dir = default_app_dir();
    async_fs::create_dir_all(&app_dir).await?;

    load_env_files(&env_files(&env::current_dir()?, &app_dir))
}

/// `.env` candidates, highest priority first.
fn env_files(working_dir: &Path, app_dir: &Path) -> [PathBuf; 2] {
    [working_dir.join(".env"), app_dir.join(".env")]
}

/// Loads each existing file in order; earlier files win.
fn load_env_files(paths: &[PathBuf]) -> Res<()> {
    for path in paths.iter().filter(|p| p.is_file()) {
        dotenv::from_path(path).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        log::debug!("loaded {}", path.display());
    }
    Ok(())
}

/// Returns the platform config directory for spotdump, `./spotdump` if the
/// platform has none.
pub fn default_app_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_NAME);
    path
}

/// Encodes client credentials for HTTP Basic authentication.
pub fn basic_auth_string(client_id: &str, client_secret: &str) -> String {
    STANDARD.encode(format!("{}:{}", client_id, client_secret))
}

fn parse_redirect_uri(redirect_uri: &str) -> Res<Url> {
    Url::parse(redirect_uri)
        .map_err(|e| Error::Config(format!("SPOTIFY_REDIRECT_URI `{}`: {}", redirect_uri, e)))
}

fn callback_path(redirect_uri: &str) -> Res<String> {
    let url = parse_redirect_uri(redirect_uri)?;
    match url.path() {
        "" | "/" => Ok("/".to_string()),
        path => Ok(path.to_string()),
    }
}

/// Derives the local bind address from the redirect URI's host and port.
fn callback_addr(redirect_uri: &str) -> Res<SocketAddr> {
    let url = parse_redirect_uri(redirect_uri)?;
    let host = match url.host_str() {
        Some("localhost") | None => "127.0.0.1",
        Some(h) => h.trim_start_matches('[').trim_end_matches(']'),
    };
    let port = url.port_or_known_default().unwrap_or(80);
    format!("{}:{}", host, port)
        .parse::<SocketAddr>()
        .or_else(|_| format!("[{}]:{}", host, port).parse::<SocketAddr>())
        .map_err(|e| Error::Config(format!("cannot bind callback server for `{}`: {}", redirect_uri, e)))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("SPOTIFY_CLIENT_ID", "id"),
        ("SPOTIFY_CLIENT_SECRET", "secret"),
        ("SPOTIFY_REDIRECT_URI", "http://localhost:8888/callback"),
        ("SPOTIFY_USERNAME", "user"),
        ("SPOTIFY_PASSWORD", "pass"),
    ];

    #[test]
    fn builds_basic_auth_from_secret() {
        let config = Config::from_lookup(lookup_from(BASE)).unwrap();
        assert_eq!(config.auth_string, STANDARD.encode("id:secret"));
        assert_eq!(config.server_addr, "127.0.0.1:8888".parse().unwrap());
        assert_eq!(config.callback_path, "/callback");
        assert_eq!(config.scope, REQUIRED_SCOPE);
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn precomputed_auth_string_wins() {
        let mut pairs = BASE.to_vec();
        pairs.retain(|(k, _)| *k != "SPOTIFY_CLIENT_SECRET");
        pairs.push(("SPOTIFY_AUTH_STRING", "abc="));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.auth_string, "abc=");
    }

    #[test]
    fn missing_username_is_reported() {
        let mut pairs = BASE.to_vec();
        pairs.retain(|(k, _)| *k != "SPOTIFY_USERNAME");
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert!(matches!(err, Error::MissingConfig("SPOTIFY_USERNAME")));
    }

    #[test]
    fn explicit_server_address_and_home() {
        let mut pairs = BASE.to_vec();
        pairs.push(("SERVER_ADDRESS", "0.0.0.0:9000"));
        pairs.push(("SPOTDUMP_HOME", "/tmp/spotdump-test"));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.server_addr.port(), 9000);
        assert_eq!(config.app_dir, PathBuf::from("/tmp/spotdump-test"));
    }

    #[test]
    fn working_dir_env_wins_over_app_dir_env() {
        let working = tempfile::TempDir::new().unwrap();
        let app = tempfile::TempDir::new().unwrap();
        std::fs::write(
            working.path().join(".env"),
            "SPOTDUMP_ENV_ORDER_SHARED=working\n",
        )
        .unwrap();
        std::fs::write(
            app.path().join(".env"),
            "SPOTDUMP_ENV_ORDER_SHARED=app\nSPOTDUMP_ENV_ORDER_APP_ONLY=app\n",
        )
        .unwrap();

        let files = env_files(working.path(), app.path());
        assert_eq!(files[0], working.path().join(".env"));
        load_env_files(&files).unwrap();

        assert_eq!(env::var("SPOTDUMP_ENV_ORDER_SHARED").unwrap(), "working");
        assert_eq!(env::var("SPOTDUMP_ENV_ORDER_APP_ONLY").unwrap(), "app");
    }

    #[test]
    fn missing_env_files_are_skipped() {
        let dir = tempfile::TempDir::new().unwrap();
        load_env_files(&env_files(dir.path(), &dir.path().join("nope"))).unwrap();
    }
}
