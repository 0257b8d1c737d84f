mod common;

use chrono::{Duration, TimeZone, Utc};
use spotdump::{
    Error,
    management::TokenStore,
    types::{AuthorizationRecord, IdentityKey},
};
use tempfile::TempDir;

use common::token;

fn key(name: &str) -> IdentityKey {
    IdentityKey::derive(name, "secret")
}

#[tokio::test]
async fn test_token_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path());
    let record = token(
        "access",
        "refresh",
        Utc.with_ymd_and_hms(2030, 1, 2, 3, 4, 5).unwrap(),
    );

    store.save_token(&key("alice"), &record).await.unwrap();
    let loaded = store.load_token(&key("alice")).await.unwrap();

    assert_eq!(loaded, Some(record));
}

#[tokio::test]
async fn test_authorization_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path());
    let record = AuthorizationRecord {
        code: "code-1".to_string(),
        scope: "user-top-read".to_string(),
    };

    assert!(!store.has_authorization(&key("alice")).await.unwrap());
    store.save_authorization(&key("alice"), &record).await.unwrap();

    assert!(store.has_authorization(&key("alice")).await.unwrap());
    assert_eq!(
        store.load_authorization(&key("alice")).await.unwrap(),
        Some(record)
    );
}

#[tokio::test]
async fn test_missing_file_and_key_are_absent() {
    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path().join("not-created-yet"));

    assert_eq!(store.load_token(&key("alice")).await.unwrap(), None);
    assert_eq!(store.load_authorization(&key("alice")).await.unwrap(), None);

    store
        .save_token(&key("alice"), &token("a", "r", Utc::now()))
        .await
        .unwrap();
    assert_eq!(store.load_token(&key("bob")).await.unwrap(), None);
}

#[tokio::test]
async fn test_save_keeps_other_identities() {
    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path());
    let expires_at = Utc::now() + Duration::hours(1);

    store
        .save_token(&key("alice"), &token("alice-access", "alice-refresh", expires_at))
        .await
        .unwrap();
    store
        .save_token(&key("bob"), &token("bob-access", "bob-refresh", expires_at))
        .await
        .unwrap();
    store
        .save_token(&key("alice"), &token("alice-new", "alice-refresh", expires_at))
        .await
        .unwrap();

    let alice = store.load_token(&key("alice")).await.unwrap().unwrap();
    let bob = store.load_token(&key("bob")).await.unwrap().unwrap();
    assert_eq!(alice.access_token, "alice-new");
    assert_eq!(bob.access_token, "bob-access");

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(store.token_path()).unwrap()).unwrap();
    assert_eq!(raw.as_object().unwrap().len(), 2);
    assert!(raw.get(key("bob").as_str()).is_some());
}

#[tokio::test]
async fn test_files_are_keyed_json_objects() {
    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path());
    let record = AuthorizationRecord {
        code: "c".to_string(),
        scope: "s".to_string(),
    };
    store.save_authorization(&key("alice"), &record).await.unwrap();

    assert_eq!(store.auth_path(), dir.path().join("auth.json"));
    assert_eq!(store.token_path(), dir.path().join("token_info.json"));

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(store.auth_path()).unwrap()).unwrap();
    assert_eq!(raw[key("alice").as_str()]["code"], "c");
    assert_eq!(raw[key("alice").as_str()]["scope"], "s");
}

#[tokio::test]
async fn test_corrupt_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path());
    std::fs::write(store.token_path(), "not json").unwrap();

    let err = store.load_token(&key("alice")).await.unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[tokio::test]
async fn test_malformed_foreign_entry_does_not_block_own_records() {
    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path());
    let foreign = serde_json::json!({
        "someoneelse": {
            "access_token": "x",
            "expires_at": "2022-08-10 18:30:00.123456"
        }
    });
    std::fs::write(store.token_path(), foreign.to_string()).unwrap();

    assert_eq!(store.load_token(&key("alice")).await.unwrap(), None);

    let record = token("alice-access", "alice-refresh", Utc::now() + Duration::hours(1));
    store.save_token(&key("alice"), &record).await.unwrap();
    assert_eq!(store.load_token(&key("alice")).await.unwrap(), Some(record));

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(store.token_path()).unwrap()).unwrap();
    assert_eq!(raw["someoneelse"], foreign["someoneelse"]);
}

#[tokio::test]
async fn test_malformed_own_entry_is_an_error() {
    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path());
    let mut raw = serde_json::Map::new();
    raw.insert(key("alice").as_str().to_string(), serde_json::json!({"code": 42}));
    std::fs::write(store.auth_path(), serde_json::Value::Object(raw).to_string()).unwrap();

    let err = store.load_authorization(&key("alice")).await.unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[tokio::test]
async fn test_save_replaces_file_without_leftovers() {
    let dir = TempDir::new().unwrap();
    let store = TokenStore::new(dir.path());
    let stale_tmp = dir.path().join("token_info.json.tmp");
    std::fs::write(&stale_tmp, "{ half written").unwrap();

    let record = token("a", "r", Utc::now());
    store.save_token(&key("alice"), &record).await.unwrap();

    assert!(!stale_tmp.exists());
    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(entries, vec!["token_info.json".to_string()]);
    assert_eq!(store.load_token(&key("alice")).await.unwrap(), Some(record));
}
