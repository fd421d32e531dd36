//! Error types for host and storage capabilities.

use thiserror::Error;

/// Errors reported by the host environment.
#[derive(Debug, Error)]
pub enum HostError {
    /// The node could not be found in the host document.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// The host failed to render a node.
    #[error("Failed to export node {node_id}: {message}")]
    Export { node_id: String, message: String },
}

/// Errors reported by client storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A stored value could not be (de)serialized.
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Backend(String),
}

/// Errors applying a settings change.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The key is not a known setting.
    #[error("Unknown setting '{0}'")]
    UnknownKey(String),

    /// The value's type differs from the default's type.
    #[error("Setting '{key}' expects a {expected} value")]
    TypeMismatch { key: String, expected: &'static str },

    /// The value has the right type but is not accepted for this key.
    #[error("Invalid value for setting '{key}': {message}")]
    InvalidValue { key: String, message: String },
}
