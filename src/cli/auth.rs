use tabled::Table;

use crate::{
    Res,
    config::Config,
    management::{CredentialBroker, TokenStore},
    spotify::{SpotifyClient, auth::BrowserLogin},
    success,
    types::{AuthStatusRow, IdentityKey},
};

/// Runs the credential lifecycle for the configured identity.
///
/// `check` only reports what is stored; `force` discards stored records and
/// logs in again.
pub async fn auth(config: &Config, force: bool, check: bool) -> Res<()> {
    let store = TokenStore::new(&config.app_dir);

    if check {
        return print_status(config, &store).await;
    }

    let client = SpotifyClient::new(config)?;
    let token = CredentialBroker::new(config, &store, &client, BrowserLogin::default())
        .resolve_access_token(force)
        .await?;

    success!(
        "Authenticated. Access token valid until {}.",
        token.expires_at.to_rfc3339()
    );
    Ok(())
}

async fn print_status(config: &Config, store: &TokenStore) -> Res<()> {
    let identity = IdentityKey::derive(&config.username, &config.password);
    let auth = store.load_authorization(&identity).await?;
    let token = store.load_token(&identity).await?;

    let authorized = store.has_authorization(&identity).await?;
    let scope_matches = auth
        .as_ref()
        .map(|a| a.matches_scope(&config.scope))
        .unwrap_or(false);
    let token_state = match &token {
        Some(t) if t.is_expired() => format!("expired at {}", t.expires_at.to_rfc3339()),
        Some(t) => format!("valid until {}", t.expires_at.to_rfc3339()),
        None => "none".to_string(),
    };

    let rows = vec![
        AuthStatusRow {
            item: "identity".to_string(),
            value: identity.to_string(),
        },
        AuthStatusRow {
            item: "auth file".to_string(),
            value: store.auth_path().display().to_string(),
        },
        AuthStatusRow {
            item: "authorized".to_string(),
            value: authorized.to_string(),
        },
        AuthStatusRow {
            item: "scope current".to_string(),
            value: scope_matches.to_string(),
        },
        AuthStatusRow {
            item: "token".to_string(),
            value: token_state,
        },
    ];

    println!("{}", Table::new(rows));
    Ok(())
}
