//! Wire types shared with the backend and OAuth endpoints.

use serde::{Deserialize, Serialize};

/// Signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// Tokens as persisted in client storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Unix timestamp in seconds
    pub expires_at: f64,
}

impl AuthTokens {
    /// Whether the access token stays valid for more than `buffer_secs`.
    pub fn is_fresh(&self, now_secs: f64, buffer_secs: f64) -> bool {
        self.expires_at > now_secs + buffer_secs
    }
}

/// Authentication state reported to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<AuthUser>,
}

/// Token endpoint response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until the access token expires
    pub expires_in: f64,
    #[serde(default)]
    pub token_type: String,
    pub user: Option<AuthUser>,
}

/// A polling session created before opening the consent page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    /// Passed to the consent page as `state`
    pub write_key: String,
    pub expires_in: u64,
}

/// Tokens delivered through a polling session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolledTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub user: AuthUser,
}

/// An uploaded file record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAttachment {
    pub id: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectDimensions {
    pub width: u32,
    pub height: u32,
}

impl Default for ProjectDimensions {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1080,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    #[serde(default)]
    pub project_id: String,
}

/// Body of `POST /infer/agent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceRequest {
    pub user_message: String,
    pub inference_context: String,
    pub chat_mode: String,
    pub conversation_id: String,
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_ids: Option<Vec<String>>,
}

impl InferenceRequest {
    /// An edit-mode request; an empty attachment list is omitted.
    pub fn new(
        project_id: impl Into<String>,
        conversation_id: impl Into<String>,
        user_message: impl Into<String>,
        attachment_ids: Vec<String>,
        inference_context: impl Into<String>,
    ) -> Self {
        Self {
            user_message: user_message.into(),
            inference_context: inference_context.into(),
            chat_mode: "edit".to_string(),
            conversation_id: conversation_id.into(),
            project_id: project_id.into(),
            attachment_ids: (!attachment_ids.is_empty()).then_some(attachment_ids),
        }
    }
}
