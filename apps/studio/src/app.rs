//! Studio application: `cosmic::Application` implementation.

use std::sync::Arc;

use cosmic::app::Core;
use cosmic::iced::{Alignment, Length};
use cosmic::widget::{self, container};
use cosmic::{Application, Element};
use tracing::{error, info, warn};

use cineframe_gemini::encoder::ACCEPTED_EXTENSIONS;
use cineframe_gemini::{ImageFile, read_image};
use cineframe_pipeline::{Command, Pipeline, StyleService, dispatch};

use crate::bridge::GeminiService;
use crate::config::{API_KEY_ENV, StudioConfig};
use crate::download;
use crate::message::{ImageSlot, Message, NavPage, SettingField};
use crate::theme;
use crate::views::{self, studio::Previews};

/// Main Studio application state.
pub struct Studio {
    core: Core,
    config: StudioConfig,
    nav_page: NavPage,
    pipeline: Pipeline,
    service: Arc<GeminiService>,
    previews: Previews,
    /// Status line for the studio page (download results, ignored picks).
    note: Option<String>,
    // -- Settings page --
    timeout_input: String,
    settings_dirty: bool,
    show_api_key: bool,
    service_note: String,
}

impl Application for Studio {
    type Executor = cosmic::executor::Default;
    type Message = Message;
    type Flags = StudioConfig;

    const APP_ID: &'static str = "io.github.cineframe.Studio";

    fn init(mut core: Core, config: StudioConfig) -> (Self, cosmic::app::Task<Message>) {
        // Disable COSMIC CSD header; other WMs provide their own buttons.
        core.window.show_headerbar = false;

        let (service, service_note) = build_service(&config);

        let app = Self {
            core,
            timeout_input: config.request_timeout_secs.to_string(),
            config,
            nav_page: NavPage::Studio,
            pipeline: Pipeline::new(),
            service,
            previews: Previews::default(),
            note: None,
            settings_dirty: false,
            show_api_key: false,
            service_note,
        };

        (app, cosmic::app::Task::none())
    }

    fn core(&self) -> &Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut Core {
        &mut self.core
    }

    fn update(&mut self, message: Message) -> cosmic::app::Task<Message> {
        let task = match message {
            Message::NavigateTo(page) => {
                self.nav_page = page;
                cosmic::app::Task::none()
            }

            Message::PickImage(slot) => cosmic::iced::Task::perform(pick_image(slot), move |r| {
                cosmic::Action::App(Message::ImageLoaded(slot, r))
            }),
            Message::ImageLoaded(_, None) => cosmic::app::Task::none(),
            Message::ImageLoaded(_, Some(Err(e))) => {
                self.pipeline.reject_file(&e);
                cosmic::app::Task::none()
            }
            Message::ImageLoaded(ImageSlot::Reference, Some(Ok(image))) => {
                let command = self.pipeline.select_reference(image);
                self.note = command
                    .is_none()
                    .then(|| ImageSlot::Reference.ignored_note().to_string());
                self.run(command)
            }
            Message::ImageLoaded(ImageSlot::User, Some(Ok(image))) => {
                let taken = self.pipeline.select_user_image(image);
                self.note = (!taken).then(|| ImageSlot::User.ignored_note().to_string());
                cosmic::app::Task::none()
            }
            Message::RequestFinished(completion) => {
                if let Some(completion) = completion {
                    self.pipeline.apply(completion);
                }
                cosmic::app::Task::none()
            }
            Message::Generate => {
                self.note = None;
                let command = self.pipeline.generate();
                self.run(command)
            }
            Message::Reset => {
                self.note = None;
                self.pipeline.reset();
                cosmic::app::Task::none()
            }

            Message::Download => match self.pipeline.session().final_image() {
                Some(image) => {
                    let image = image.clone();
                    let start_dir = self.config.download_dir.clone();
                    cosmic::iced::Task::perform(
                        download::save_with_dialog(image, start_dir),
                        |r| {
                            let r = r
                                .map(|p| p.map(|p| p.display().to_string()))
                                .map_err(|e| e.to_string());
                            cosmic::Action::App(Message::DownloadFinished(r))
                        },
                    )
                }
                None => cosmic::app::Task::none(),
            },
            Message::DownloadFinished(result) => {
                match result {
                    Ok(Some(path)) => self.note = Some(format!("Saved to {path}")),
                    Ok(None) => {}
                    Err(e) => {
                        error!(error = %e, "failed to save final image");
                        self.note = Some(format!("Could not save the image: {e}"));
                    }
                }
                cosmic::app::Task::none()
            }

            Message::UpdateSetting(field, value) => {
                self.update_setting(field, value);
                cosmic::app::Task::none()
            }
            Message::SaveSettings => {
                self.save_settings();
                cosmic::app::Task::none()
            }
            Message::ToggleApiKeyVisibility => {
                self.show_api_key = !self.show_api_key;
                cosmic::app::Task::none()
            }
        };

        self.previews.sync(self.pipeline.session());
        task
    }

    fn view(&self) -> Element<'_, Message> {
        let sidebar = self.view_sidebar();
        let content = self.view_content();

        widget::row()
            .push(sidebar)
            .push(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

impl Studio {
    /// Runs a pipeline command in the background.
    fn run(&self, command: Command) -> cosmic::app::Task<Message> {
        if command.is_none() {
            return cosmic::app::Task::none();
        }
        let service: Arc<dyn StyleService> = self.service.clone();
        cosmic::iced::Task::perform(dispatch(service, command), |completion| {
            cosmic::Action::App(Message::RequestFinished(completion))
        })
    }

    fn update_setting(&mut self, field: SettingField, value: String) {
        match field {
            SettingField::ApiKey => self.config.api_key = value,
            SettingField::AnalysisModel => self.config.analysis_model = value,
            SettingField::ImageModel => self.config.image_model = value,
            SettingField::BaseUrl => self.config.base_url = value,
            SettingField::RequestTimeout => {
                let digits: String = value.chars().filter(char::is_ascii_digit).collect();
                self.config.request_timeout_secs = digits.parse().unwrap_or(0);
                self.timeout_input = digits;
            }
            SettingField::DownloadDir => self.config.download_dir = value,
        }
        self.settings_dirty = true;
    }

    /// Persists the config and rebuilds the client from it.
    fn save_settings(&mut self) {
        let (service, note) = build_service(&self.config);
        self.service = service;
        self.service_note = note;

        match self.config.save() {
            Ok(()) => {
                info!("settings saved");
                self.settings_dirty = false;
            }
            Err(e) => {
                error!(error = %e, "failed to save settings");
                self.service_note = format!("Failed to save settings: {e}");
            }
        }
    }

    /// Renders the sidebar with navigation buttons.
    fn view_sidebar(&self) -> Element<'_, Message> {
        let mut nav = widget::column().spacing(4).padding([16, 8]);

        let header = widget::column()
            .push(widget::text::title4("Cineframe").class(theme::CYAN))
            .push(widget::text::caption("Cinematic portrait studio").class(theme::MUTED_TEXT))
            .spacing(2)
            .padding([0, 8, 16, 8]);
        nav = nav.push(header);

        for page in NavPage::ALL {
            let is_active = self.nav_page == page;

            let label = if is_active {
                widget::text(page.label()).class(theme::CYAN)
            } else {
                widget::text(page.label())
            };
            let btn: Element<'_, Message> = widget::button::custom(label)
                .on_press(Message::NavigateTo(page))
                .width(Length::Fill)
                .into();

            if is_active {
                nav = nav.push(container(btn).class(cosmic::theme::Container::Custom(
                    Box::new(theme::nav_active_bg),
                )));
            } else {
                nav = nav.push(btn);
            }
        }

        nav = nav.push(widget::Space::with_height(Length::Fill));

        let (status_text, status_color) = if self.service.is_available() {
            ("Gemini ready", theme::CYAN)
        } else {
            ("No API key configured", theme::MUTED_TEXT)
        };
        nav = nav.push(
            widget::text::caption(status_text)
                .class(status_color)
                .width(Length::Fill)
                .align_x(Alignment::Center),
        );

        container(nav)
            .width(Length::Fixed(200.0))
            .height(Length::Fill)
            .class(cosmic::theme::Container::Custom(Box::new(theme::sidebar_bg)))
            .into()
    }

    /// Renders the main content area based on the active nav page.
    fn view_content(&self) -> Element<'_, Message> {
        let content = match self.nav_page {
            NavPage::Studio => views::studio::view(
                self.pipeline.session(),
                &self.previews,
                self.note.as_deref(),
            ),
            NavPage::Settings => views::settings::view(views::settings::SettingsState {
                config: &self.config,
                timeout_input: &self.timeout_input,
                dirty: self.settings_dirty,
                show_api_key: self.show_api_key,
                service_note: &self.service_note,
                env_key_set: std::env::var(API_KEY_ENV).is_ok_and(|k| !k.trim().is_empty()),
            }),
        };

        container(content)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(24)
            .class(cosmic::theme::Container::Custom(Box::new(theme::content_bg)))
            .into()
    }
}

/// Builds the service, falling back to an unavailable one on failure.
fn build_service(config: &StudioConfig) -> (Arc<GeminiService>, String) {
    match GeminiService::from_config(config) {
        Ok(service) => {
            info!(
                analysis_model = %config.analysis_model,
                image_model = %config.image_model,
                "Gemini client ready"
            );
            (Arc::new(service), "Gemini client ready.".into())
        }
        Err(e) => {
            warn!(error = %e, "Gemini client unavailable");
            let note = format!("Gemini client unavailable: {e}");
            (Arc::new(GeminiService::unavailable(e.to_string())), note)
        }
    }
}

/// Opens the picker for `slot` and reads the chosen file.
///
/// `None` when the dialog was cancelled.
async fn pick_image(slot: ImageSlot) -> Option<Result<ImageFile, String>> {
    let handle = rfd::AsyncFileDialog::new()
        .set_title(slot.dialog_title())
        .add_filter("Images", &ACCEPTED_EXTENSIONS)
        .pick_file()
        .await?;

    Some(read_image(handle.path()).await.map_err(|e| e.to_string()))
}
