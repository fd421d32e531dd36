//! Error types for the backend client and authentication.

use thiserror::Error;

use scenecode_core::StorageError;

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Failures talking to the backend API.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The endpoint needs a bearer token and none is configured.
    #[error("Authentication required to {0}")]
    AuthRequired(&'static str),

    /// Getting a token failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The backend answered with a non-success status.
    #[error("{action}: {status} {message}")]
    Status {
        action: &'static str,
        status: u16,
        message: String,
    },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Asset(#[from] scenecode_assets::AssetError),

    #[error("No file was uploaded")]
    NothingUploaded,
}

impl BackendError {
    /// Whether the caller should start a login flow.
    pub fn requires_reauthentication(&self) -> bool {
        match self {
            BackendError::AuthRequired(_) => true,
            BackendError::Auth(err) => err.requires_reauthentication(),
            BackendError::Status { status, .. } => *status == 401,
            _ => false,
        }
    }
}

/// Failures in the OAuth flow and token lifecycle.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No auth tokens found - user must log in")]
    NotAuthenticated,

    /// Refresh failed; stored auth has been cleared.
    #[error("Session expired - please log in again: {0}")]
    SessionExpired(String),

    /// The token endpoint rejected the request.
    #[error("{0}")]
    Rejected(String),

    #[error("Failed to get user info: {0}")]
    UserInfo(u16),

    #[error("Failed to create auth session: {status} {message}")]
    Session { status: u16, message: String },

    #[error("Authentication timed out")]
    Timeout,

    #[error("Authentication cancelled")]
    Cancelled,

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Whether the caller should start a login flow.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::NotAuthenticated | AuthError::SessionExpired(_))
    }
}
