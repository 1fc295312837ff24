//! Studio message types for the iced/cosmic runtime.

use cineframe_gemini::ImageFile;
use cineframe_pipeline::Completion;

/// Navigation pages in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavPage {
    Studio,
    Settings,
}

impl NavPage {
    /// Display label for the sidebar.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Studio => "Studio",
            Self::Settings => "Settings",
        }
    }

    /// All pages in sidebar order.
    pub const ALL: [NavPage; 2] = [Self::Studio, Self::Settings];
}

/// Which upload slot a picked file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    Reference,
    User,
}

impl ImageSlot {
    pub fn dialog_title(&self) -> &'static str {
        match self {
            Self::Reference => "Choose a reference frame",
            Self::User => "Choose your photo",
        }
    }

    /// Shown when a picked file arrives while the slot is locked.
    pub fn ignored_note(&self) -> &'static str {
        match self {
            Self::Reference => {
                "Reference not changed: wait for the current request to finish."
            }
            Self::User => "Photo not changed: wait for the portrait to finish generating.",
        }
    }
}

/// Top-level message enum for the Studio application.
#[derive(Debug, Clone)]
pub enum Message {
    // -- Navigation --
    /// Switch to a sidebar page.
    NavigateTo(NavPage),

    // -- Workflow --
    /// Open the native picker for an upload slot.
    PickImage(ImageSlot),
    /// Picker closed and the file was read. `None` when cancelled.
    ImageLoaded(ImageSlot, Option<Result<ImageFile, String>>),
    /// A remote request finished. `None` when nothing was dispatched.
    RequestFinished(Option<Completion>),
    /// User clicked "Generate Final Image".
    Generate,
    /// User clicked "Start Over".
    Reset,

    // -- Download --
    /// Save the final image to disk.
    Download,
    /// Save finished; `Ok(None)` when the dialog was cancelled.
    DownloadFinished(Result<Option<String>, String>),

    // -- Settings --
    /// Update a setting field value.
    UpdateSetting(SettingField, String),
    /// Save settings to disk and rebuild the client.
    SaveSettings,
    /// Toggle visibility of the API key field.
    ToggleApiKeyVisibility,
}

/// Fields in settings that can be edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingField {
    ApiKey,
    AnalysisModel,
    ImageModel,
    BaseUrl,
    RequestTimeout,
    DownloadDir,
}
