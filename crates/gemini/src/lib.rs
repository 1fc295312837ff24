//! Gemini API client for the cinematic portrait workflow.
//!
//! Two calls against the `generateContent` endpoint:
//!
//! 1. **Analyze**: describe a reference image as a structured
//!    [`StyleDescription`] (declared response schema, JSON output).
//! 2. **Generate**: render a user photo in that style and return the
//!    generated [`FinalImage`].
//!
//! Image files are read and base64-encoded by [`encoder`] so they can be
//! embedded in the JSON request body.

pub mod client;
pub mod encoder;
pub mod prompt;
pub mod types;

pub use client::{Client, Error};
pub use encoder::{EncodeError, EncodedImage, read_image};
pub use types::{FinalImage, ImageFile, StyleDescription};
