//! The backend capability used to store uploaded images.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Body of the upload slot request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadRequest {
    pub node_id: String,
    pub node_name: String,
    pub width: f64,
    pub height: f64,
    pub format: String,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

/// A pre-signed upload slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSlot {
    pub upload_url: String,
    pub public_url: String,
}

/// Uploads rasterized nodes to external storage.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Whether the uploader has what it needs to make requests.
    fn is_configured(&self) -> bool {
        true
    }

    /// Ask the backend for a time-limited upload slot.
    async fn request_upload_url(&self, request: &ImageUploadRequest) -> Result<UploadSlot>;

    /// PUT PNG bytes to a slot's upload URL.
    async fn upload_image(&self, upload_url: &str, bytes: Vec<u8>) -> Result<()>;
}
