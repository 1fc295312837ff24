//! Image file reading and base64 transport encoding.
//!
//! The API takes images inline as `{ mimeType, data }` where `data` is
//! base64 text. [`EncodedImage`] is that pair.

use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD};
use tracing::debug;

use crate::types::ImageFile;

/// File extensions accepted by the pickers.
pub const ACCEPTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Errors from reading or encoding an image.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported image type: {0}")]
    UnsupportedType(String),
}

/// Detects the media type of an accepted image from its extension.
pub fn detect_mime_type(path: &Path) -> Option<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("png") => Some("image/png"),
        Some("jpg" | "jpeg") => Some("image/jpeg"),
        Some("webp") => Some("image/webp"),
        _ => None,
    }
}

/// Reads an image file from disk.
pub async fn read_image(path: impl AsRef<Path>) -> Result<ImageFile, EncodeError> {
    let path = path.as_ref();
    let mime_type = detect_mime_type(path)
        .ok_or_else(|| EncodeError::UnsupportedType(path.display().to_string()))?;

    let bytes = tokio::fs::read(path).await?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    debug!(path = %path.display(), mime = mime_type, size = bytes.len(), "image read");
    Ok(ImageFile::new(name, mime_type, bytes))
}

/// Base64 payload plus media type, ready to embed in a JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub data: String,
    pub mime_type: String,
}

impl EncodedImage {
    /// Encodes an in-memory image.
    pub fn from_image(image: &ImageFile) -> Self {
        Self {
            data: STANDARD.encode(&image.bytes),
            mime_type: image.mime_type.clone(),
        }
    }
}
