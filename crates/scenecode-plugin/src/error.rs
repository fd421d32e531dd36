//! Run-level errors surfaced to the UI.

use thiserror::Error;

use scenecode_backend::{AuthError, BackendError};
use scenecode_codegen::CodegenError;
use scenecode_core::{SettingsError, StorageError};

/// Result type for orchestrator operations.
pub type Result<T> = std::result::Result<T, ConversionError>;

/// Failures that end a run, export or project generation. The display
/// text is what the UI shows.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("No layers selected")]
    EmptySelection,

    #[error("No selection to export")]
    NothingToExport,

    #[error("Please select a maximum of {max} elements to export")]
    SelectionLimit { max: usize },

    #[error(transparent)]
    Generation(#[from] CodegenError),

    #[error(transparent)]
    Upload(#[from] BackendError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// No signed-in user is stored.
    #[error("User not authenticated")]
    MissingUser,

    /// Export, project generation and login need a configured backend.
    #[error("Backend is not configured")]
    BackendUnavailable,

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ConversionError {
    /// Whether the user has to log in again before retrying.
    pub fn requires_reauthentication(&self) -> bool {
        match self {
            ConversionError::Auth(err) => err.requires_reauthentication(),
            ConversionError::Upload(err) => err.requires_reauthentication(),
            ConversionError::MissingUser => true,
            _ => false,
        }
    }
}
