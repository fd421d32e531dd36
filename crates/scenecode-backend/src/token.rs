//! Access tokens with automatic, de-duplicated refresh.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::error::AuthError;
use crate::oauth::OAuthClient;
use crate::storage::AuthStorage;
use crate::types::{AuthState, AuthTokens};

/// Tokens expiring within this many seconds are refreshed first.
pub const EXPIRY_BUFFER_SECS: f64 = 60.0;

/// Something that can hand out a bearer token.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, AuthError>;
}

/// A fixed token, for tests and preconfigured deployments.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<String, AuthError> {
        Ok(self.0.clone())
    }
}

pub(crate) fn now_secs() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}

/// Hands out stored access tokens, refreshing them when they are about
/// to expire. Concurrent callers share a single refresh.
pub struct TokenProvider {
    storage: AuthStorage,
    oauth: Arc<OAuthClient>,
    refresh: Mutex<()>,
}

impl TokenProvider {
    pub fn new(storage: AuthStorage, oauth: Arc<OAuthClient>) -> Self {
        Self {
            storage,
            oauth,
            refresh: Mutex::new(()),
        }
    }

    pub fn storage(&self) -> &AuthStorage {
        &self.storage
    }

    pub fn oauth(&self) -> &OAuthClient {
        &self.oauth
    }

    /// Whether tokens are stored. Expired tokens still count, since they
    /// may refresh.
    pub async fn is_authenticated(&self) -> Result<bool, AuthError> {
        Ok(self.storage.tokens().await?.is_some())
    }

    pub async fn auth_state(&self) -> Result<AuthState, AuthError> {
        Ok(AuthState {
            is_authenticated: self.is_authenticated().await?,
            user: self.storage.user().await?,
        })
    }

    /// Forget all stored auth data.
    pub async fn clear(&self) -> Result<(), AuthError> {
        Ok(self.storage.clear_all().await?)
    }

    async fn stored(&self) -> Result<AuthTokens, AuthError> {
        self.storage.tokens().await?.ok_or(AuthError::NotAuthenticated)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<String, AuthError> {
        match self.oauth.refresh_access_token(refresh_token).await {
            Ok(response) => {
                let tokens = AuthTokens {
                    access_token: response.access_token,
                    refresh_token: response.refresh_token,
                    expires_at: now_secs() + response.expires_in,
                };
                self.storage.save_tokens(&tokens).await?;
                info!("access token refreshed");
                Ok(tokens.access_token)
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed, clearing stored auth");
                if let Err(clear_err) = self.storage.clear_all().await {
                    warn!(error = %clear_err, "failed to clear stored auth");
                }
                Err(AuthError::SessionExpired(err.to_string()))
            }
        }
    }
}

#[async_trait]
impl TokenSource for TokenProvider {
    async fn access_token(&self) -> Result<String, AuthError> {
        let tokens = self.stored().await?;
        if tokens.is_fresh(now_secs(), EXPIRY_BUFFER_SECS) {
            return Ok(tokens.access_token);
        }

        let _guard = self.refresh.lock().await;
        // A caller ahead of us may have refreshed while we waited.
        let tokens = self.stored().await?;
        if tokens.is_fresh(now_secs(), EXPIRY_BUFFER_SECS) {
            return Ok(tokens.access_token);
        }
        self.refresh(&tokens.refresh_token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OAuthConfig;
    use scenecode_core::MemoryStorage;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn provider(server: &MockServer, expires_at: Option<f64>) -> TokenProvider {
        let storage = AuthStorage::new(Arc::new(MemoryStorage::new()));
        if let Some(expires_at) = expires_at {
            storage
                .save_tokens(&AuthTokens {
                    access_token: "old".into(),
                    refresh_token: "r1".into(),
                    expires_at,
                })
                .await
                .unwrap();
        }
        let oauth = OAuthClient::new(OAuthConfig::new("https://app", server.uri()));
        TokenProvider::new(storage, Arc::new(oauth))
    }

    #[tokio::test]
    async fn test_fresh_token_needs_no_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
        let tokens = provider(&server, Some(now_secs() + 3600.0)).await;
        assert_eq!(tokens.access_token().await.unwrap(), "old");
    }

    #[tokio::test]
    async fn test_missing_tokens() {
        let server = MockServer::start().await;
        let tokens = provider(&server, None).await;
        let err = tokens.access_token().await.unwrap_err();
        assert!(err.requires_reauthentication());
        assert_eq!(err.to_string(), "No auth tokens found - user must log in");
        assert!(!tokens.is_authenticated().await.unwrap());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_callers_share_one_refresh() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/oauth/refresh"))
            .and(body_partial_json(json!({"grantType": "refresh_token", "refreshToken": "r1"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({
                        "accessToken": "new",
                        "refreshToken": "r2",
                        "expiresIn": 3600,
                        "tokenType": "Bearer"
                    }))
                    .set_delay(std::time::Duration::from_millis(50)),
            )
            .expect(1)
            .mount(&server)
            .await;
        // within the expiry buffer
        let tokens = Arc::new(provider(&server, Some(now_secs() + 30.0)).await);

        let (a, b) = tokio::join!(tokens.access_token(), tokens.access_token());
        assert_eq!(a.unwrap(), "new");
        assert_eq!(b.unwrap(), "new");
        let stored = tokens.storage().tokens().await.unwrap().unwrap();
        assert_eq!(stored.refresh_token, "r2");
        assert!(stored.expires_at > now_secs() + 3000.0);
    }

    #[tokio::test]
    async fn test_failed_refresh_clears_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/oauth/refresh"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "invalid_grant"})))
            .expect(1)
            .mount(&server)
            .await;
        let tokens = provider(&server, Some(0.0)).await;
        let err = tokens.access_token().await.unwrap_err();
        assert!(matches!(err, AuthError::SessionExpired(_)));
        assert!(err.requires_reauthentication());
        assert_eq!(err.to_string(), "Session expired - please log in again: invalid_grant");
        assert!(tokens.storage().tokens().await.unwrap().is_none());
    }
}
