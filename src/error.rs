use thiserror::Error;

/// Error types for spotdump operations.
///
/// Variants are grouped the way failures surface to the user: configuration
/// problems at startup, authentication problems while resolving a token,
/// resource-call failures, bad command input, and transport errors.
#[derive(Error, Debug)]
pub enum Error {
    /// A required configuration value is not set.
    #[error("missing configuration value `{0}`")]
    MissingConfig(&'static str),

    /// A configuration value is set but unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The browser login did not reach the callback in time.
    #[error("login timed out after {0} seconds. Re-run `spotdump auth --force`.")]
    LoginTimeout(u64),

    /// The authorization callback reported a failure.
    #[error("login failed: {0}")]
    Login(String),

    /// The token endpoint answered with a non-200 status.
    #[error("token request failed with status {status}: {body}")]
    TokenEndpoint { status: u16, body: String },

    /// A resource endpoint answered with a non-200 status.
    #[error("Error {status}: {body}")]
    Api { status: u16, body: String },

    /// A 200 response did not have the expected shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Command input could not be used (id files, timestamps, trimming).
    #[error("{0}")]
    Input(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
