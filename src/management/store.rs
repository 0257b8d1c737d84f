use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

use crate::{
    Res,
    types::{AuthorizationRecord, IdentityKey, TokenRecord},
};

const AUTH_FILE: &str = "auth.json";
const TOKEN_FILE: &str = "token_info.json";

/// On-disk store for authorization and token records.
///
/// Both files are JSON objects keyed by [`IdentityKey`]. Reads treat a missing
/// file or key as absent and only decode the caller's own entry. Writes merge
/// into what is already there, leaving other identities' entries untouched, and
/// replace the file through a rename. There is no locking.
#[derive(Debug, Clone)]
pub struct TokenStore {
    dir: PathBuf,
}

impl TokenStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn auth_path(&self) -> PathBuf {
        self.dir.join(AUTH_FILE)
    }

    pub fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    pub async fn load_authorization(&self, key: &IdentityKey) -> Res<Option<AuthorizationRecord>> {
        load_entry(&self.auth_path(), key).await
    }

    pub async fn save_authorization(&self, key: &IdentityKey, record: &AuthorizationRecord) -> Res<()> {
        save_entry(&self.auth_path(), key, record).await
    }

    pub async fn load_token(&self, key: &IdentityKey) -> Res<Option<TokenRecord>> {
        load_entry(&self.token_path(), key).await
    }

    pub async fn save_token(&self, key: &IdentityKey, record: &TokenRecord) -> Res<()> {
        save_entry(&self.token_path(), key, record).await
    }

    pub async fn has_authorization(&self, key: &IdentityKey) -> Res<bool> {
        Ok(self.load_authorization(key).await?.is_some())
    }
}

async fn read_file(path: &Path) -> Res<Map<String, Value>> {
    match async_fs::read_to_string(path).await {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Map::new()),
        Err(e) => Err(e.into()),
    }
}

async fn load_entry<T: DeserializeOwned>(path: &Path, key: &IdentityKey) -> Res<Option<T>> {
    let mut entries = read_file(path).await?;
    match entries.remove(key.as_str()) {
        Some(entry) => Ok(Some(serde_json::from_value(entry)?)),
        None => Ok(None),
    }
}

async fn save_entry<T: Serialize>(path: &Path, key: &IdentityKey, record: &T) -> Res<()> {
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    let mut entries = read_file(path).await?;
    entries.insert(key.as_str().to_string(), serde_json::to_value(record)?);

    let tmp = path.with_extension("json.tmp");
    async_fs::write(&tmp, serde_json::to_string_pretty(&entries)?).await?;
    async_fs::rename(&tmp, path).await?;
    log::debug!("wrote {}", path.display());
    Ok(())
}
