//! Saving the final image as PNG.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use cineframe_gemini::FinalImage;
use image::ImageFormat;

/// Suggested file name in the save dialog.
pub const DEFAULT_FILE_NAME: &str = "cinematic_portrait.png";

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("could not decode generated image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encoder task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Returns PNG bytes for the image, re-encoding when the model sent
/// another format.
pub fn encode_png(image: &FinalImage) -> Result<Vec<u8>, DownloadError> {
    if image.is_png() {
        return Ok(image.bytes.to_vec());
    }

    let decoded = image::load_from_memory(&image.bytes)?;
    let mut out = Cursor::new(Vec::new());
    decoded.write_to(&mut out, ImageFormat::Png)?;
    tracing::debug!(from = %image.mime_type, size = out.get_ref().len(), "re-encoded as PNG");
    Ok(out.into_inner())
}

/// Encodes off the UI runtime and writes to `path`.
pub async fn write_png(path: &Path, image: FinalImage) -> Result<(), DownloadError> {
    let bytes = tokio::task::spawn_blocking(move || encode_png(&image)).await??;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

/// Asks for a destination and saves the image there.
///
/// Returns the written path, or `None` when the dialog was cancelled.
pub async fn save_with_dialog(
    image: FinalImage,
    start_dir: String,
) -> Result<Option<PathBuf>, DownloadError> {
    let mut dialog = rfd::AsyncFileDialog::new()
        .set_title("Save portrait")
        .set_file_name(DEFAULT_FILE_NAME)
        .add_filter("PNG image", &["png"]);
    if !start_dir.trim().is_empty() {
        dialog = dialog.set_directory(start_dir.trim());
    }

    let Some(handle) = dialog.save_file().await else {
        return Ok(None);
    };

    let path = with_png_extension(handle.path().to_path_buf());
    write_png(&path, image).await?;
    tracing::info!(path = %path.display(), "final image saved");
    Ok(Some(path))
}

fn with_png_extension(path: PathBuf) -> PathBuf {
    let is_png = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"));
    if is_png { path } else { path.with_extension("png") }
}
