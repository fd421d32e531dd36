//! OAuth 2.0 authorization code flow with PKCE and token polling.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::OAuthConfig;
use crate::error::AuthError;
use crate::types::{AuthSession, AuthUser, PolledTokens, TokenResponse};

/// Interval between polling attempts.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Total visible time to wait for the user to authorize.
pub const POLL_TIMEOUT: Duration = Duration::from_secs(300);

pub const STATUS_WAITING: &str = "Waiting for authorization in your browser...";
pub const STATUS_PAUSED: &str = "Paused while the plugin is in the background";

/// Shared controls for a running poll: cooperative cancellation and the
/// visibility of the UI surface.
#[derive(Debug, Clone)]
pub struct PollControl {
    cancelled: Arc<AtomicBool>,
    visible: Arc<AtomicBool>,
}

impl PollControl {
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            visible: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Stop the poll before its next attempt.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

impl Default for PollControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Polling cadence.
#[derive(Debug, Clone, Copy)]
pub struct PollOptions {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            timeout: POLL_TIMEOUT,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: Option<String>,
    error_description: Option<String>,
}

/// Client for the OAuth endpoints of the API.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    http: reqwest::Client,
    config: OAuthConfig,
}

impl OAuthClient {
    pub fn new(config: OAuthConfig) -> Self {
        Self::with_http(reqwest::Client::new(), config)
    }

    pub fn with_http(http: reqwest::Client, config: OAuthConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Consent page URL the user opens in a browser.
    pub fn build_auth_url(&self, code_challenge: &str, state: &str) -> String {
        let base = format!("{}/oauth/consent", self.config.web_app_url.trim_end_matches('/'));
        let params = [
            ("responseType", "code"),
            ("clientId", self.config.client_id.as_str()),
            ("redirectUri", self.config.redirect_uri.as_str()),
            ("codeChallenge", code_challenge),
            ("codeChallengeMethod", "S256"),
            ("state", state),
        ];
        match Url::parse_with_params(&base, params) {
            Ok(url) => url.to_string(),
            Err(err) => {
                warn!(error = %err, %base, "invalid web app URL");
                base
            }
        }
    }

    /// Register a polling session; the returned write key goes in the
    /// consent URL's `state`.
    pub async fn create_session(&self, read_key: &str) -> Result<AuthSession, AuthError> {
        let response = self
            .http
            .post(self.config.api("/api/oauth/session"))
            .json(&json!({ "clientId": self.config.client_id, "readKey": read_key }))
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(AuthError::Session {
                status,
                message: error_text(response).await,
            });
        }
        Ok(response.json().await?)
    }

    /// Poll the session until tokens arrive.
    ///
    /// Time spent while the UI is hidden does not count against the
    /// timeout. `on_status` receives a message before every attempt.
    pub async fn poll_for_tokens(
        &self,
        read_key: &str,
        options: PollOptions,
        control: &PollControl,
        mut on_status: impl FnMut(&str),
    ) -> Result<PolledTokens, AuthError> {
        let url = self.config.api(&format!("/api/oauth/session/{}", read_key));
        let mut waited = Duration::ZERO;
        loop {
            if control.is_cancelled() {
                info!("token polling cancelled");
                return Err(AuthError::Cancelled);
            }
            if waited >= options.timeout {
                return Err(AuthError::Timeout);
            }
            if !control.is_visible() {
                on_status(STATUS_PAUSED);
                tokio::time::sleep(options.interval).await;
                continue;
            }

            on_status(STATUS_WAITING);
            let response = self.http.get(&url).send().await?;
            match response.status() {
                StatusCode::OK => return Ok(response.json().await?),
                StatusCode::ACCEPTED | StatusCode::NO_CONTENT | StatusCode::NOT_FOUND => {
                    debug!("authorization pending");
                }
                status => {
                    return Err(AuthError::Session {
                        status: status.as_u16(),
                        message: error_text(response).await,
                    })
                }
            }
            tokio::time::sleep(options.interval).await;
            waited += options.interval;
        }
    }

    pub async fn exchange_code_for_token(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenResponse, AuthError> {
        let response = self
            .http
            .post(self.config.api("/api/oauth/token"))
            .json(&json!({
                "grantType": "authorization_code",
                "code": code,
                "redirectUri": self.config.redirect_uri,
                "codeVerifier": code_verifier,
                "clientId": self.config.client_id,
            }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(rejection(response, "Token exchange failed").await);
        }
        Ok(response.json().await?)
    }

    /// Refresh tokens rotate: always store the returned refresh token.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenResponse, AuthError> {
        let response = self
            .http
            .post(self.config.api("/api/oauth/refresh"))
            .json(&json!({
                "grantType": "refresh_token",
                "refreshToken": refresh_token,
                "clientId": self.config.client_id,
            }))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(rejection(response, "Token refresh failed").await);
        }
        Ok(response.json().await?)
    }

    pub async fn user_info(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .http
            .get(self.config.api("/api/oauth/me"))
            .bearer_auth(access_token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AuthError::UserInfo(response.status().as_u16()));
        }
        Ok(response.json().await?)
    }

    /// Best effort: failures are logged, never returned.
    pub async fn revoke_token(&self, token: &str) {
        let result = self
            .http
            .post(self.config.api("/api/oauth/revoke"))
            .bearer_auth(token)
            .send()
            .await;
        match result {
            Ok(response) if !response.status().is_success() => {
                warn!(status = response.status().as_u16(), "token revocation rejected");
            }
            Err(err) => warn!(error = %err, "failed to revoke token"),
            Ok(_) => {}
        }
    }
}

/// Error from an OAuth error body, preferring `error_description`.
async fn rejection(response: Response, fallback: &str) -> AuthError {
    let status = response.status().as_u16();
    let message = match response.json::<OAuthErrorBody>().await {
        Ok(body) => body
            .error_description
            .or(body.error)
            .unwrap_or_else(|| format!("{}: {}", fallback, status)),
        Err(_) => format!("{}: {}", fallback, status),
    };
    AuthError::Rejected(message)
}

pub(crate) async fn error_text(response: Response) -> String {
    let reason = response.status().canonical_reason().unwrap_or("").to_string();
    match response.text().await {
        Ok(text) if !text.is_empty() => text,
        _ => reason,
    }
}
