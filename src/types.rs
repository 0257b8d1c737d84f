use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tabled::Tabled;

use crate::{Error, Res};

/// Number of digest bytes kept for an identity key.
const IDENTITY_KEY_BYTES: usize = 13;

/// Lookup key for the stored auth and token records.
///
/// Derived from the configured username and password so several local
/// identities can share one record file. It is a namespace, not a secret: the
/// stored tokens are not protected by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn derive(username: &str, password: &str) -> Self {
        let digest = Sha256::digest(format!("{}:{}", username, password).as_bytes());
        let hex = digest[..IDENTITY_KEY_BYTES]
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect::<String>();
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRecord {
    pub code: String,
    pub scope: String,
}

impl AuthorizationRecord {
    /// Whether this code was granted for exactly `required_scope`.
    pub fn matches_scope(&self, required_scope: &str) -> bool {
        self.scope == required_scope
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub scope: String,
    pub expires_in: u64,
    pub expires_at: DateTime<Utc>,
}

impl TokenRecord {
    /// Builds a record from a token endpoint response issued at `issued_at`.
    ///
    /// `prior_refresh_token` is kept when the response carries none, which is
    /// how refresh responses usually look.
    ///
    /// # Errors
    ///
    /// [`Error::UnexpectedResponse`] when there is no refresh token to keep or
    /// `expires_in` does not fit a timestamp.
    pub fn from_response(
        response: TokenResponse,
        issued_at: DateTime<Utc>,
        prior_refresh_token: Option<&str>,
    ) -> Res<Self> {
        let refresh_token = response
            .refresh_token
            .or_else(|| prior_refresh_token.map(str::to_string))
            .ok_or_else(|| {
                Error::UnexpectedResponse("token response has no refresh_token".to_string())
            })?;

        let expires_at = i64::try_from(response.expires_in)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .ok_or_else(|| {
                Error::UnexpectedResponse(format!(
                    "token response has out-of-range expires_in {}",
                    response.expires_in
                ))
            })?;

        Ok(Self {
            access_token: response.access_token,
            refresh_token,
            token_type: response.token_type,
            scope: response.scope,
            expires_in: response.expires_in,
            expires_at,
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Body returned by the token endpoint for both grant types.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
    pub expires_in: u64,
    pub refresh_token: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// Catalog resources that exist both as a single and a batch endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Tracks,
    Artists,
    AudioFeatures,
}

impl Resource {
    /// Path segment below the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Tracks => "tracks",
            Resource::Artists => "artists",
            Resource::AudioFeatures => "audio-features",
        }
    }

    /// Key wrapping the array in a batch response.
    pub fn batch_key(&self) -> &'static str {
        match self {
            Resource::Tracks => "tracks",
            Resource::Artists => "artists",
            Resource::AudioFeatures => "audio_features",
        }
    }
}

/// Result of looking up one or several catalog IDs.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    /// Exactly one ID was requested; the object is returned unwrapped.
    Single(Value),
    /// Two or more IDs were requested; objects are in request order.
    Batch(Vec<Value>),
}

impl Lookup {
    /// JSON as the API shapes it: a bare object, or `{ "<key>": [...] }`.
    pub fn into_payload(self, resource: Resource) -> Value {
        match self {
            Lookup::Single(value) => value,
            Lookup::Batch(items) => {
                let mut wrapped = Map::new();
                wrapped.insert(resource.batch_key().to_string(), Value::Array(items));
                Value::Object(wrapped)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TopItemType {
    Artists,
    Tracks,
}

impl TopItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopItemType::Artists => "artists",
            TopItemType::Tracks => "tracks",
        }
    }
}

/// Over what time frame top-item affinities are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimeRange {
    /// Several years of data
    Long,
    /// Approximately the last 6 months
    Medium,
    /// Approximately the last 4 weeks
    Short,
}

impl TimeRange {
    pub fn as_query(&self) -> &'static str {
        match self {
            TimeRange::Long => "long_term",
            TimeRange::Medium => "medium_term",
            TimeRange::Short => "short_term",
        }
    }
}

/// Which side of the timestamp the recently-played cursor points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Direction {
    Before,
    After,
}

impl Direction {
    pub fn as_query(&self) -> &'static str {
        match self {
            Direction::Before => "before",
            Direction::After => "after",
        }
    }
}

/// What the OAuth callback handler has seen so far.
#[derive(Debug, Clone)]
pub struct CallbackState {
    pub expected_state: String,
    pub outcome: Option<Result<String, String>>,
}

impl CallbackState {
    pub fn new(expected_state: String) -> Self {
        Self {
            expected_state,
            outcome: None,
        }
    }
}

#[derive(Tabled)]
pub struct AuthStatusRow {
    pub item: String,
    pub value: String,
}
