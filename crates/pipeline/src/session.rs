//! Session snapshot and derived stage status.

use cineframe_gemini::{FinalImage, ImageFile, StyleDescription};

use crate::error::PipelineError;

/// Workflow stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Reference,
    Personalization,
    FinalOutput,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Self::Reference, Self::Personalization, Self::FinalOutput];

    /// 1-based number shown in the stage badge.
    pub fn number(&self) -> u8 {
        match self {
            Self::Reference => 1,
            Self::Personalization => 2,
            Self::FinalOutput => 3,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Reference => "Reference Understanding",
            Self::Personalization => "Personalization",
            Self::FinalOutput => "Final Output",
        }
    }
}

/// Displayed state of a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Pending,
    Active,
    Complete,
}

impl StageStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Complete => "complete",
        }
    }
}

/// Identifies one outstanding request.
///
/// Completions carrying any other ticket are stale and get dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(pub(crate) u64);

/// Immutable snapshot of the workflow.
///
/// Only [`crate::Pipeline`] builds new snapshots; everything else reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub(crate) reference_image: Option<ImageFile>,
    pub(crate) user_image: Option<ImageFile>,
    pub(crate) style: Option<StyleDescription>,
    pub(crate) final_image: Option<FinalImage>,
    pub(crate) analyzing: Option<Ticket>,
    pub(crate) generating: Option<Ticket>,
    pub(crate) error: Option<PipelineError>,
}

impl Session {
    pub fn reference_image(&self) -> Option<&ImageFile> {
        self.reference_image.as_ref()
    }

    pub fn user_image(&self) -> Option<&ImageFile> {
        self.user_image.as_ref()
    }

    pub fn style(&self) -> Option<&StyleDescription> {
        self.style.as_ref()
    }

    pub fn final_image(&self) -> Option<&FinalImage> {
        self.final_image.as_ref()
    }

    pub fn error(&self) -> Option<PipelineError> {
        self.error
    }

    /// Stage 1 busy flag.
    pub fn is_analyzing(&self) -> bool {
        self.analyzing.is_some()
    }

    /// Stage 3 busy flag.
    pub fn is_generating(&self) -> bool {
        self.generating.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.is_analyzing() || self.is_generating()
    }

    /// Whether the generate action should be enabled.
    pub fn can_generate(&self) -> bool {
        self.user_image.is_some() && self.style.is_some() && !self.is_busy()
    }

    /// Whether any input or output exists (the "Start Over" action is shown).
    pub fn has_progress(&self) -> bool {
        self.reference_image.is_some() || self.user_image.is_some() || self.final_image.is_some()
    }

    /// Projects the snapshot onto a stage's displayed status.
    pub fn stage_status(&self, stage: Stage) -> StageStatus {
        match stage {
            Stage::Reference => {
                if self.style.is_some() {
                    StageStatus::Complete
                } else {
                    StageStatus::Active
                }
            }
            Stage::Personalization => match (&self.style, &self.user_image) {
                (None, _) => StageStatus::Pending,
                (Some(_), None) => StageStatus::Active,
                (Some(_), Some(_)) => StageStatus::Complete,
            },
            Stage::FinalOutput => match (&self.user_image, &self.final_image) {
                (None, _) => StageStatus::Pending,
                (Some(_), None) => StageStatus::Active,
                (Some(_), Some(_)) => StageStatus::Complete,
            },
        }
    }
}
