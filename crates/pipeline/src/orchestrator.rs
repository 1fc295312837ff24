//! Stage orchestrator.
//!
//! [`Pipeline`] owns the current [`Session`] and exposes the only
//! transitions that change it. Transitions that need the remote service
//! return a [`Command`]; the caller runs it with [`dispatch`] and feeds the
//! resulting [`Completion`] back through [`Pipeline::apply`].
//!
//! Requests are serialized: while either request is outstanding, new
//! analysis and generation commands are refused, and the user photo is
//! frozen while a generation runs. Each command carries a
//! [`Ticket`]; completions for anything but the outstanding ticket (for
//! example after a reset) are dropped.

use std::sync::Arc;

use cineframe_gemini::{FinalImage, ImageFile, StyleDescription};
use tracing::{error, info, warn};

use crate::error::{PipelineError, ServiceError};
use crate::service::StyleService;
use crate::session::{Session, Ticket};

/// Work the caller must run after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    None,
    Analyze {
        ticket: Ticket,
        image: ImageFile,
    },
    Generate {
        ticket: Ticket,
        image: ImageFile,
        style: StyleDescription,
    },
}

impl Command {
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Result of running a [`Command`].
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Analysis {
        ticket: Ticket,
        result: Result<StyleDescription, ServiceError>,
    },
    Generation {
        ticket: Ticket,
        result: Result<FinalImage, ServiceError>,
    },
}

/// Runs a command against the service.
///
/// Returns `None` for [`Command::None`].
pub async fn dispatch(service: Arc<dyn StyleService>, command: Command) -> Option<Completion> {
    match command {
        Command::None => None,
        Command::Analyze { ticket, image } => {
            let result = service.analyze(&image).await;
            Some(Completion::Analysis { ticket, result })
        }
        Command::Generate {
            ticket,
            image,
            style,
        } => {
            let result = service.generate(&image, &style).await;
            Some(Completion::Generation { ticket, result })
        }
    }
}

/// Owner of the session state machine.
#[derive(Debug, Default)]
pub struct Pipeline {
    session: Session,
    next_ticket: u64,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot.
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn issue_ticket(&mut self) -> Ticket {
        self.next_ticket += 1;
        Ticket(self.next_ticket)
    }

    /// Stage 1: a reference image was chosen.
    ///
    /// Invalidates the style description and final image and starts
    /// analysis. Refused while any request is in flight.
    pub fn select_reference(&mut self, image: ImageFile) -> Command {
        if self.session.is_busy() {
            warn!(file = %image.name, "reference selection ignored, request in flight");
            return Command::None;
        }

        let ticket = self.issue_ticket();
        info!(file = %image.name, ?ticket, "reference image selected");
        self.session = Session {
            reference_image: Some(image.clone()),
            style: None,
            final_image: None,
            error: None,
            analyzing: Some(ticket),
            ..self.session.clone()
        };
        Command::Analyze { ticket, image }
    }

    /// Stage 2: the user's photo was chosen.
    ///
    /// Invalidates the final image only. Refused while a generation is in
    /// flight; returns whether the image was taken.
    pub fn select_user_image(&mut self, image: ImageFile) -> bool {
        if self.session.is_generating() {
            warn!(file = %image.name, "user image selection ignored, generation in flight");
            return false;
        }

        info!(file = %image.name, "user image selected");
        self.session = Session {
            user_image: Some(image),
            final_image: None,
            error: None,
            ..self.session.clone()
        };
        true
    }

    /// Stage 3: the user asked for the final image.
    pub fn generate(&mut self) -> Command {
        let (Some(image), Some(style)) = (&self.session.user_image, &self.session.style) else {
            warn!("generate requested before prerequisites");
            self.session = Session {
                error: Some(PipelineError::Validation),
                ..self.session.clone()
            };
            return Command::None;
        };
        if self.session.is_busy() {
            warn!("generate ignored, request in flight");
            return Command::None;
        }

        let (image, style) = (image.clone(), style.clone());
        let ticket = self.issue_ticket();
        info!(?ticket, "generation requested");
        self.session = Session {
            final_image: None,
            error: None,
            generating: Some(ticket),
            ..self.session.clone()
        };
        Command::Generate {
            ticket,
            image,
            style,
        }
    }

    /// Applies the outcome of an analysis request.
    pub fn finish_analysis(
        &mut self,
        ticket: Ticket,
        result: Result<StyleDescription, ServiceError>,
    ) {
        if self.session.analyzing != Some(ticket) {
            warn!(?ticket, "stale analysis result dropped");
            return;
        }

        self.session = match result {
            Ok(style) => {
                info!(?ticket, "style description stored");
                Session {
                    style: Some(style),
                    analyzing: None,
                    ..self.session.clone()
                }
            }
            Err(e) => {
                error!(?ticket, error = %e, "reference analysis failed");
                Session {
                    analyzing: None,
                    error: Some(PipelineError::Analysis),
                    ..self.session.clone()
                }
            }
        };
    }

    /// Applies the outcome of a generation request.
    pub fn finish_generation(&mut self, ticket: Ticket, result: Result<FinalImage, ServiceError>) {
        if self.session.generating != Some(ticket) {
            warn!(?ticket, "stale generation result dropped");
            return;
        }

        self.session = match result {
            Ok(image) => {
                info!(?ticket, mime = %image.mime_type, "final image stored");
                Session {
                    final_image: Some(image),
                    generating: None,
                    ..self.session.clone()
                }
            }
            Err(e) => {
                error!(?ticket, error = %e, "portrait generation failed");
                Session {
                    generating: None,
                    error: Some(PipelineError::Generation),
                    ..self.session.clone()
                }
            }
        };
    }

    /// Routes a completion to the matching transition.
    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::Analysis { ticket, result } => self.finish_analysis(ticket, result),
            Completion::Generation { ticket, result } => self.finish_generation(ticket, result),
        }
    }

    /// A picked file could not be read; nothing else changes.
    pub fn reject_file(&mut self, detail: &str) {
        error!(error = %detail, "selected file unreadable");
        self.session = Session {
            error: Some(PipelineError::UnreadableFile),
            ..self.session.clone()
        };
    }

    /// Returns every stage to its initial state.
    ///
    /// Outstanding requests are forgotten; their results will be dropped.
    pub fn reset(&mut self) {
        info!("session reset");
        self.session = Session::default();
    }
}
