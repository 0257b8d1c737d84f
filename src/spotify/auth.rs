use std::{sync::Arc, time::Duration};

use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{StatusCode, Url, header::AUTHORIZATION};
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{
    Error, Res,
    config::Config,
    server::start_api_server,
    spotify::SpotifyClient,
    success,
    types::{AuthorizationRecord, CallbackState, TokenRecord, TokenResponse},
    utils, warning,
};

/// How long the browser login may take before it is abandoned.
pub const LOGIN_TIMEOUT: Duration = Duration::from_secs(90);

impl SpotifyClient {
    /// Exchanges an authorization code for an access/refresh token pair.
    ///
    /// # Errors
    ///
    /// [`Error::TokenEndpoint`] on a non-200 answer and
    /// [`Error::UnexpectedResponse`] when the body lacks a refresh token.
    pub async fn exchange_code(&self, code: &str) -> Res<TokenRecord> {
        let issued_at = Utc::now();
        let response = self
            .request_token(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.redirect_uri.as_str()),
            ])
            .await?;

        TokenRecord::from_response(response, issued_at, None)
    }

    /// Trades a refresh token for a new access token.
    ///
    /// Spotify may or may not rotate the refresh token; when the response
    /// carries none, `refresh_token` is kept in the returned record.
    pub async fn refresh(&self, refresh_token: &str) -> Res<TokenRecord> {
        let issued_at = Utc::now();
        let response = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        TokenRecord::from_response(response, issued_at, Some(refresh_token))
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Res<TokenResponse> {
        log::debug!("POST {} grant_type={}", self.token_url, form[0].1);
        let res = self
            .http
            .post(&self.token_url)
            .header(AUTHORIZATION, format!("Basic {}", self.auth_string))
            .form(form)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        if status != StatusCode::OK {
            return Err(Error::TokenEndpoint {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| Error::UnexpectedResponse(format!("token response: {}", e)))
    }
}

/// Obtains a fresh authorization code from the user.
#[allow(async_fn_in_trait)]
pub trait Login {
    async fn authorize(&self, config: &Config) -> Res<AuthorizationRecord>;
}

/// Login through the user's browser.
///
/// Opens Spotify's authorize page and captures the redirect on a local
/// callback server, giving up after `timeout`.
#[derive(Debug, Clone)]
pub struct BrowserLogin {
    pub timeout: Duration,
}

impl Default for BrowserLogin {
    fn default() -> Self {
        Self {
            timeout: LOGIN_TIMEOUT,
        }
    }
}

impl Login for BrowserLogin {
    async fn authorize(&self, config: &Config) -> Res<AuthorizationRecord> {
        let state = utils::generate_state();
        let auth_url = authorize_url(config, &state)?;

        let shared_state = Arc::new(Mutex::new(CallbackState::new(state)));
        let mut server = tokio::spawn(start_api_server(
            config.server_addr,
            config.callback_path.clone(),
            Arc::clone(&shared_state),
        ));

        if webbrowser::open(auth_url.as_str()).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                auth_url
            )
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message("Waiting for Spotify login in the browser...");

        let code = wait_for_code(shared_state, &mut server, self.timeout).await;

        server.abort();
        spinner.finish_and_clear();

        let code = code?;
        success!("Authorization code received.");
        Ok(AuthorizationRecord {
            code,
            scope: config.scope.clone(),
        })
    }
}

/// Builds the authorize URL the user is sent to.
pub fn authorize_url(config: &Config, state: &str) -> Res<Url> {
    Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", config.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("scope", config.scope.as_str()),
            ("state", state),
        ],
    )
    .map_err(|e| Error::Config(format!("SPOTIFY_API_AUTH_URL `{}`: {}", config.auth_url, e)))
}

/// Polls the callback state once a second until the handler has recorded an
/// outcome, the server dies, or `max_wait` passes.
async fn wait_for_code(
    shared_state: Arc<Mutex<CallbackState>>,
    server: &mut JoinHandle<Res<()>>,
    max_wait: Duration,
) -> Res<String> {
    use std::time::Instant;

    let start = Instant::now();

    while start.elapsed() < max_wait {
        let mut lock = shared_state.lock().await;
        if let Some(outcome) = lock.outcome.take() {
            return outcome.map_err(Error::Login);
        }
        drop(lock);

        if server.is_finished() {
            return match server.await {
                Ok(Err(e)) => Err(e),
                _ => Err(Error::Login("callback server stopped unexpectedly".to_string())),
            };
        }

        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    Err(Error::LoginTimeout(max_wait.as_secs()))
}
