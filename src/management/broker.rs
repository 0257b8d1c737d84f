use crate::{
    Res,
    config::Config,
    info,
    management::TokenStore,
    spotify::{SpotifyClient, auth::Login},
    types::{AuthorizationRecord, IdentityKey, TokenRecord},
};

/// Resolves a usable access token for the configured identity.
///
/// Per identity the stored credentials move through: nothing stored, code
/// stored, valid token, expired token. Login is re-entered whenever the stored
/// code was granted for a different scope. Records are written only after the
/// call that produced them succeeded.
pub struct CredentialBroker<'a, L: Login> {
    config: &'a Config,
    store: &'a TokenStore,
    client: &'a SpotifyClient,
    login: L,
    identity: IdentityKey,
}

impl<'a, L: Login> CredentialBroker<'a, L> {
    pub fn new(config: &'a Config, store: &'a TokenStore, client: &'a SpotifyClient, login: L) -> Self {
        let identity = IdentityKey::derive(&config.username, &config.password);
        Self {
            config,
            store,
            client,
            login,
            identity,
        }
    }

    pub fn identity(&self) -> &IdentityKey {
        &self.identity
    }

    /// Returns a token that is not expired, logging in, exchanging or
    /// refreshing as needed.
    ///
    /// With `force` the stored records are ignored and a fresh login and
    /// exchange always happen.
    ///
    /// # Errors
    ///
    /// Login timeouts, token endpoint failures and store I/O errors are
    /// returned as-is; nothing is retried.
    pub async fn resolve_access_token(&self, force: bool) -> Res<TokenRecord> {
        if force {
            let auth = self.login_and_save().await?;
            return self.exchange_and_save(&auth.code).await;
        }

        let auth = match self.store.load_authorization(&self.identity).await? {
            Some(auth) if auth.matches_scope(&self.config.scope) => auth,
            Some(_) => {
                info!("Requested scope changed, logging in again.");
                self.login_and_save().await?
            }
            None => self.login_and_save().await?,
        };

        let token = match self.store.load_token(&self.identity).await? {
            Some(token) => token,
            None => return self.exchange_and_save(&auth.code).await,
        };

        if token.is_expired() {
            log::debug!("token for {} expired at {}", self.identity, token.expires_at);
            let refreshed = self.client.refresh(&token.refresh_token).await?;
            self.store.save_token(&self.identity, &refreshed).await?;
            return Ok(refreshed);
        }

        Ok(token)
    }

    async fn login_and_save(&self) -> Res<AuthorizationRecord> {
        let auth = self.login.authorize(self.config).await?;
        self.store.save_authorization(&self.identity, &auth).await?;
        Ok(auth)
    }

    async fn exchange_and_save(&self, code: &str) -> Res<TokenRecord> {
        let token = self.client.exchange_code(code).await?;
        self.store.save_token(&self.identity, &token).await?;
        Ok(token)
    }
}
