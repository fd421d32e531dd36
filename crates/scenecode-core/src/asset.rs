//! Resolved references to image and vector assets.

use serde::{Deserialize, Serialize};

/// Base URL of the sized stand-in image service.
pub const PLACEHOLDER_BASE_URL: &str = "https://placehold.co";

/// How a generator should reference an image or vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AssetReference {
    /// Bytes inlined as base64
    InlineBase64 { mime_type: String, data: String },
    /// SVG markup inlined verbatim
    InlineSvg { svg: String },
    /// Uploaded asset at a public URL
    RemoteUrl { url: String },
    /// Sized stand-in
    Placeholder { width: u32, height: u32 },
}

impl AssetReference {
    /// Deterministic placeholder sized to the given dimensions.
    pub fn placeholder(width: f64, height: f64) -> Self {
        AssetReference::Placeholder {
            width: round_dimension(width),
            height: round_dimension(height),
        }
    }

    /// A URL usable in `src` attributes: remote, data URI or placeholder.
    ///
    /// Inline SVG has no URL form and yields a data URI of the markup.
    pub fn url(&self) -> String {
        match self {
            AssetReference::InlineBase64 { mime_type, data } => {
                format!("data:{};base64,{}", mime_type, data)
            }
            AssetReference::InlineSvg { svg } => {
                format!("data:image/svg+xml;utf8,{}", svg.replace('#', "%23").replace('"', "'"))
            }
            AssetReference::RemoteUrl { url } => url.clone(),
            AssetReference::Placeholder { width, height } => placeholder_url(*width, *height),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, AssetReference::Placeholder { .. })
    }
}

/// URL of the stand-in image for a size.
pub fn placeholder_url(width: u32, height: u32) -> String {
    format!("{}/{}x{}", PLACEHOLDER_BASE_URL, width, height)
}

fn round_dimension(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round().max(1.0) as u32
    } else {
        1
    }
}
