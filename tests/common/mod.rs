#![allow(dead_code)]
use std::{
    path::Path,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use chrono::{DateTime, Utc};
use spotdump::{
    Error, Res,
    config::{self, Config, REQUIRED_SCOPE},
    spotify::auth::Login,
    types::{AuthorizationRecord, TokenRecord},
};

/// Basic credentials for `client:secret`.
pub const BASIC_AUTH: &str = "Basic Y2xpZW50OnNlY3JldA==";

/// Config pointing every endpoint at a mock server and the records at `app_dir`.
pub fn test_config(server_uri: &str, app_dir: &Path) -> Config {
    Config {
        client_id: "client".to_string(),
        auth_string: config::basic_auth_string("client", "secret"),
        redirect_uri: "http://127.0.0.1:8888/callback".to_string(),
        username: "user".to_string(),
        password: "pass".to_string(),
        scope: REQUIRED_SCOPE.to_string(),
        server_addr: "127.0.0.1:8888".parse().unwrap(),
        callback_path: "/callback".to_string(),
        auth_url: format!("{}/authorize", server_uri),
        token_url: format!("{}/api/token", server_uri),
        api_url: format!("{}/v1", server_uri),
        app_dir: app_dir.to_path_buf(),
    }
}

pub fn token(access: &str, refresh: &str, expires_at: DateTime<Utc>) -> TokenRecord {
    TokenRecord {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
        token_type: "Bearer".to_string(),
        scope: REQUIRED_SCOPE.to_string(),
        expires_in: 3600,
        expires_at,
    }
}

/// Login that hands out a fixed code and counts how often it was asked.
#[derive(Clone)]
pub struct ScriptedLogin {
    pub code: String,
    pub fail: bool,
    pub calls: Arc<AtomicUsize>,
}

impl ScriptedLogin {
    pub fn new(code: &str) -> Self {
        Self {
            code: code.to_string(),
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new("unused")
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Login for ScriptedLogin {
    async fn authorize(&self, config: &Config) -> Res<AuthorizationRecord> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(Error::LoginTimeout(90));
        }
        Ok(AuthorizationRecord {
            code: self.code.clone(),
            scope: config.scope.clone(),
        })
    }
}
