//! Three-stage portrait workflow.
//!
//! This crate implements the **state orchestration** for the studio. It
//! has no UI or transport dependencies: the app supplies a
//! [`StyleService`] implementation that bridges to the Gemini client.
//!
//! # Stages
//!
//! 1. **Reference Understanding**: analyze a reference image into a
//!    style description
//! 2. **Personalization**: choose the user's photo
//! 3. **Final Output**: generate the styled portrait
//!
//! Session state is an immutable [`Session`] snapshot that [`Pipeline`]
//! replaces on every transition. Stage status is derived from it.

pub mod error;
pub mod orchestrator;
pub mod service;
pub mod session;

pub use error::{PipelineError, ServiceError};
pub use orchestrator::{Command, Completion, Pipeline, dispatch};
pub use service::StyleService;
pub use session::{Session, Stage, StageStatus, Ticket};
