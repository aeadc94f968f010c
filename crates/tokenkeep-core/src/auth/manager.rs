use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::AuthOptions;
use crate::error::{AuthError, Result};
use crate::storage::{get_storage, SettingsStorage, StorageBackend};
use crate::token::{Token, TokenType, TwoFactorStatus};

/// Owns the persisted credential for one storage name.
///
/// The in-memory token is filled by `set_key` or by the first query, and
/// dropped only by `remove_key`. Writes made to storage behind this
/// manager's back are not noticed while a token is cached.
pub struct Auth<S = StorageBackend> {
    storage: S,
    token_key: String,
    token: Option<Token>,
}

impl Auth<StorageBackend> {
    /// Build a manager over the backend selected by `options`
    pub fn new(options: AuthOptions) -> Result<Self> {
        let storage = get_storage(&options)?;
        Ok(Self::with_storage(storage, options.token_key))
    }
}

impl<S: SettingsStorage> Auth<S> {
    pub fn with_storage(storage: S, token_key: impl Into<String>) -> Self {
        Self {
            storage,
            token_key: token_key.into(),
            token: None,
        }
    }

    pub fn token_key(&self) -> &str {
        &self.token_key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The token currently held in memory, without touching storage
    pub fn cached_token(&self) -> Option<&Token> {
        self.token.as_ref()
    }

    // ===== Storage =====

    /// Validate and persist a new credential.
    ///
    /// An invalid or expired key is rejected before anything changes. If the
    /// storage write fails the new token is still cached.
    pub async fn set_key(&mut self, key: &str) -> Result<()> {
        self.set_key_at(key, Utc::now()).await
    }

    pub async fn set_key_at(&mut self, key: &str, now: DateTime<Utc>) -> Result<()> {
        let token = Self::create_token(key, now)?;
        debug!(token_key = %self.token_key, token_type = %token.token_type(), "Storing credential");
        self.token = Some(token);
        self.storage.set(&self.token_key, key).await.map_err(|e| {
            warn!(token_key = %self.token_key, error = %e, "Failed to persist credential");
            AuthError::from(e)
        })
    }

    /// Whether storage holds a value. The in-memory token is not consulted.
    pub async fn has_key(&self) -> Result<bool> {
        Ok(self.storage.has(&self.token_key).await?)
    }

    /// Forget the credential. Succeeds when nothing was stored.
    pub async fn remove_key(&mut self) -> Result<()> {
        self.token = None;
        debug!(token_key = %self.token_key, "Removing credential");
        Ok(self.storage.remove(&self.token_key).await?)
    }

    // ===== Token queries =====

    pub async fn get_type(&mut self) -> Result<TokenType> {
        Ok(self.token().await?.token_type())
    }

    pub async fn get_key(&mut self) -> Result<String> {
        Ok(self.token().await?.key().to_string())
    }

    /// `Ok(None)` when the credential carries no issued-at claim
    pub async fn get_age(&mut self) -> Result<Option<Duration>> {
        self.get_age_at(Utc::now()).await
    }

    pub async fn get_age_at(&mut self, now: DateTime<Utc>) -> Result<Option<Duration>> {
        Ok(self.token().await?.age_at(now))
    }

    pub async fn is_expired(&mut self) -> Result<bool> {
        self.is_expired_at(Utc::now()).await
    }

    pub async fn is_expired_at(&mut self, now: DateTime<Utc>) -> Result<bool> {
        Ok(self.token().await?.is_expired_at(now))
    }

    pub async fn is_valid(&mut self) -> Result<bool> {
        Ok(self.token().await?.is_valid())
    }

    pub async fn get_2fa_status(&mut self) -> Result<TwoFactorStatus> {
        Ok(self.token().await?.two_factor_status())
    }

    pub async fn needs_2fa(&mut self) -> Result<bool> {
        Ok(self.get_2fa_status().await? == TwoFactorStatus::Pending)
    }

    // ===== Helpers =====

    fn create_token(key: &str, now: DateTime<Utc>) -> Result<Token> {
        let token = Token::classify(key);
        if !token.is_valid() {
            return Err(AuthError::malformed(key));
        }
        if token.is_expired_at(now) {
            return Err(AuthError::expired(key));
        }
        Ok(token)
    }

    /// Cached token, or the one rebuilt from storage. A stored credential is
    /// taken as-is: the `set_key` checks are not re-applied.
    async fn token(&mut self) -> Result<&Token> {
        let token = match self.token.take() {
            Some(token) => token,
            None => self.load_token().await?,
        };
        Ok(&*self.token.insert(token))
    }

    async fn load_token(&self) -> Result<Token> {
        match self.storage.get(&self.token_key).await? {
            Some(Value::String(key)) => {
                let token = Token::classify(key);
                debug!(token_key = %self.token_key, token_type = %token.token_type(), "Loaded credential from storage");
                Ok(token)
            }
            other => {
                debug!(token_key = %self.token_key, "No usable credential in storage");
                Err(AuthError::malformed_stored(other.as_ref()))
            }
        }
    }
}
