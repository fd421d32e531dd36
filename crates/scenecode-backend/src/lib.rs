//! Backend API client and authentication for scenecode.
//!
//! - [`BackendClient`] - image upload slots, file uploads, projects and inference
//! - [`OAuthClient`] - PKCE authorization, session polling and token endpoints
//! - [`TokenProvider`] - stored tokens with de-duplicated refresh
//! - [`AuthStorage`] - auth keys in host client storage

pub mod client;
pub mod config;
pub mod error;
pub mod oauth;
pub mod pkce;
pub mod storage;
pub mod token;
pub mod types;

pub use client::BackendClient;
pub use config::{BackendConfig, OAuthConfig, DEFAULT_CLIENT_ID, DEFAULT_TIMEOUT_SECS};
pub use error::{AuthError, BackendError, Result};
pub use oauth::{OAuthClient, PollControl, PollOptions, POLL_INTERVAL, POLL_TIMEOUT, STATUS_PAUSED, STATUS_WAITING};
pub use storage::AuthStorage;
pub use token::{StaticToken, TokenProvider, TokenSource, EXPIRY_BUFFER_SECS};
pub use types::{
    AuthSession, AuthState, AuthTokens, AuthUser, Conversation, FileAttachment, InferenceRequest, PolledTokens,
    Project, ProjectDimensions, TokenResponse,
};
