//! Error types for the asset pipeline.

use thiserror::Error;

use scenecode_core::HostError;

/// Result type for asset operations.
pub type Result<T> = std::result::Result<T, AssetError>;

/// Asset-level failures. The pipeline turns these into placeholders and a
/// warning; they only surface directly from the batch file upload.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Host failed to render the node
    #[error(transparent)]
    Export(#[from] HostError),

    #[error("Failed to request upload URL: {status} {message}")]
    UploadUrl { status: u16, message: String },

    #[error("Failed to upload image: {status} {message}")]
    Upload { status: u16, message: String },

    /// Network or timeout failure before a response arrived
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Image upload is not configured")]
    NotConfigured,

    #[error("Exported SVG is not valid UTF-8")]
    InvalidSvg,

    #[error("No files to upload")]
    NoFiles,
}
