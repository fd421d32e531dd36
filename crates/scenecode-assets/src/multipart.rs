//! Hand-built `multipart/form-data` bodies for batch file uploads.
//!
//! Each file is written as a `file` part immediately followed by its
//! `description` part, so the N-th description always belongs to the N-th
//! file.

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::error::{AssetError, Result};

const CRLF: &[u8] = b"\r\n";

/// One file in a batch upload.
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
    pub description: String,
}

impl MultipartFile {
    /// An HTML document.
    pub fn html(filename: impl Into<String>, html: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            content_type: "text/html".to_string(),
            data: html.into().into_bytes(),
            description: description.into(),
        }
    }
}

/// An encoded body and its boundary.
#[derive(Debug, Clone)]
pub struct MultipartBody {
    pub boundary: String,
    pub body: Vec<u8>,
}

impl MultipartBody {
    /// Value for the `Content-Type` request header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }
}

/// Encode files with a fresh random boundary.
///
/// Every file becomes a `file` part carrying its filename and content type,
/// followed directly by a plain `description` text part. Parts keep input
/// order. There is no single comma-separated `descriptions` field, so
/// receivers must pair each `description` with the `file` part before it.
pub fn encode_multipart(files: &[MultipartFile]) -> Result<MultipartBody> {
    if files.is_empty() {
        return Err(AssetError::NoFiles);
    }
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect();
    let boundary = format!("----ScenecodeFormBoundary{}", suffix);
    let body = encode_with_boundary(files, &boundary);
    Ok(MultipartBody { boundary, body })
}

/// Encode files using the given boundary.
pub fn encode_with_boundary(files: &[MultipartFile], boundary: &str) -> Vec<u8> {
    let mut body = Vec::new();
    for file in files {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                boundary,
                escape_quoted(&file.filename),
                file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(&file.data);
        body.extend_from_slice(CRLF);

        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"description\"\r\n\r\n",
                boundary
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.description.as_bytes());
        body.extend_from_slice(CRLF);
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());
    body
}

fn escape_quoted(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .map(|c| if c == '"' { "%22".to_string() } else { c.to_string() })
        .collect()
}
