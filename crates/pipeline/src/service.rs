//! Remote style service trait.
//!
//! `StyleService` is implemented by the studio app on top of the Gemini
//! client. Using a trait keeps the orchestrator decoupled from transport
//! and testable with mocks.

use std::future::Future;
use std::pin::Pin;

use cineframe_gemini::{FinalImage, ImageFile, StyleDescription};

use crate::error::ServiceError;

/// Abstract connection to the generative-AI service.
pub trait StyleService: Send + Sync {
    /// Describes a reference image.
    fn analyze(
        &self,
        image: &ImageFile,
    ) -> Pin<Box<dyn Future<Output = Result<StyleDescription, ServiceError>> + Send + '_>>;

    /// Renders the user image in the described style.
    fn generate(
        &self,
        image: &ImageFile,
        style: &StyleDescription,
    ) -> Pin<Box<dyn Future<Output = Result<FinalImage, ServiceError>> + Send + '_>>;
}
