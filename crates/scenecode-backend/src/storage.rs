//! Auth data persisted in host client storage.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use scenecode_core::{ClientStorage, StorageError};

use crate::types::{AuthTokens, AuthUser};

pub const TOKENS_KEY: &str = "aspects_auth_tokens";
pub const USER_KEY: &str = "aspects_auth_user";
pub const PKCE_VERIFIER_KEY: &str = "aspects_pkce_verifier";
pub const OAUTH_STATE_KEY: &str = "aspects_oauth_state";

/// Typed access to the auth keys of a [`ClientStorage`].
#[derive(Clone)]
pub struct AuthStorage {
    storage: Arc<dyn ClientStorage>,
}

impl AuthStorage {
    pub fn new(storage: Arc<dyn ClientStorage>) -> Self {
        Self { storage }
    }

    pub async fn save_tokens(&self, tokens: &AuthTokens) -> Result<(), StorageError> {
        self.put(TOKENS_KEY, tokens).await
    }

    pub async fn tokens(&self) -> Result<Option<AuthTokens>, StorageError> {
        self.fetch(TOKENS_KEY).await
    }

    pub async fn save_user(&self, user: &AuthUser) -> Result<(), StorageError> {
        self.put(USER_KEY, user).await
    }

    pub async fn user(&self) -> Result<Option<AuthUser>, StorageError> {
        self.fetch(USER_KEY).await
    }

    pub async fn save_pkce_verifier(&self, verifier: &str) -> Result<(), StorageError> {
        self.put(PKCE_VERIFIER_KEY, &verifier).await
    }

    pub async fn pkce_verifier(&self) -> Result<Option<String>, StorageError> {
        self.fetch(PKCE_VERIFIER_KEY).await
    }

    pub async fn save_oauth_state(&self, state: &str) -> Result<(), StorageError> {
        self.put(OAUTH_STATE_KEY, &state).await
    }

    pub async fn oauth_state(&self) -> Result<Option<String>, StorageError> {
        self.fetch(OAUTH_STATE_KEY).await
    }

    /// Remove every auth key (logout).
    pub async fn clear_all(&self) -> Result<(), StorageError> {
        for key in [TOKENS_KEY, USER_KEY, PKCE_VERIFIER_KEY, OAUTH_STATE_KEY] {
            self.storage.delete(key).await?;
        }
        Ok(())
    }

    async fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        self.storage.set(key, serde_json::to_value(value)?).await
    }

    /// Missing keys and values of the wrong shape both read as `None`.
    async fn fetch<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let Some(value) = self.storage.get(key).await? else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(err) => {
                tracing::warn!(key, error = %err, "ignoring malformed auth value");
                Ok(None)
            }
        }
    }
}
