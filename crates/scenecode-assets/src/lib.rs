//! Image and vector asset pipeline.
//!
//! - [`AssetPipeline`] - per-node inline/upload/placeholder decisions
//! - [`AssetCache`] - session-scoped upload cache keyed by host node id
//! - [`ImageUploader`] - backend capability for storing images
//! - [`HiddenChildren`] - scoped child hiding for isolated exports
//! - [`encode_multipart`] - batch file upload bodies

pub mod cache;
pub mod error;
pub mod multipart;
pub mod pipeline;
pub mod uploader;
pub mod visibility;

pub use cache::{AssetCache, ImageAsset};
pub use error::{AssetError, Result};
pub use multipart::{encode_multipart, encode_with_boundary, MultipartBody, MultipartFile};
pub use pipeline::{AssetPipeline, EXPORT_FAILED_WARNING, UPLOADED_WARNING, UPLOAD_FAILED_WARNING};
pub use uploader::{ImageUploadRequest, ImageUploader, UploadSlot};
pub use visibility::HiddenChildren;
