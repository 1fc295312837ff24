//! Pipeline error types.

/// Errors shown to the user.
///
/// `Display` is the banner text; underlying detail only goes to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to analyze the reference image. Please try another one.")]
    Analysis,

    #[error(
        "Failed to generate the final image. The model may be unable to process this combination."
    )]
    Generation,

    #[error("Please complete all previous steps first.")]
    Validation,

    #[error("Could not read the selected image. Please choose a PNG, JPEG or WEBP file.")]
    UnreadableFile,
}

/// Failure of a remote call, as reported by a [`crate::StyleService`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("service error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("response contained no image: {0}")]
    NoImage(String),

    #[error("service unavailable: {0}")]
    Unavailable(String),
}
