//! Error types for normalization.

use thiserror::Error;

/// Result type for normalization.
pub type Result<T> = std::result::Result<T, NormalizeError>;

/// Node-level problems. These never abort a run; the normalizer turns them
/// into placeholder nodes plus a warning.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NormalizeError {
    /// Host type tag with no intermediate counterpart
    #[error("Unsupported node type \"{host_type}\" in \"{name}\" converted to placeholder")]
    UnsupportedType { name: String, host_type: String },

    /// Subtree nested beyond the supported depth
    #[error("Layer \"{name}\" is nested too deeply and was converted to placeholder")]
    TooDeep { name: String },

    /// Top-level node the host cannot render
    #[error("Skipped \"{name}\": layer cannot be exported")]
    NotExportable { name: String },

    /// Top-level node without usable geometry
    #[error("Skipped \"{name}\": layer has no bounding box")]
    NoBoundingBox { name: String },
}
