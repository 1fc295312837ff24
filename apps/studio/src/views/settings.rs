//! Settings view: API key, models, endpoint, timeout and download folder.

use cosmic::iced::Length;
use cosmic::widget::{self, container};
use cosmic::Element;

use crate::config::{API_KEY_ENV, StudioConfig};
use crate::message::{Message, SettingField};
use crate::theme;

/// Editable settings state passed in by the app.
pub struct SettingsState<'a> {
    pub config: &'a StudioConfig,
    /// Text of the timeout field, kept separately so partial input survives.
    pub timeout_input: &'a str,
    pub dirty: bool,
    pub show_api_key: bool,
    /// Client status line ("ready" or why it could not be built).
    pub service_note: &'a str,
    pub env_key_set: bool,
}

/// Renders the settings view.
pub fn view<'a>(state: SettingsState<'a>) -> Element<'a, Message> {
    let mut content = widget::column().spacing(16);

    content = content.push(widget::text::title3("Settings"));

    let api_key = widget::column()
        .push(widget::text::caption("Gemini API Key").class(theme::MUTED_TEXT))
        .push(
            widget::secure_input(
                "Gemini API Key",
                state.config.api_key.as_str(),
                Some(Message::ToggleApiKeyVisibility),
                !state.show_api_key,
            )
            .on_input(|v| Message::UpdateSetting(SettingField::ApiKey, v)),
        )
        .spacing(4);

    let mut form = widget::column().push(api_key).spacing(12);
    if state.env_key_set {
        form = form.push(
            widget::text::caption(format!("{API_KEY_ENV} is set and takes precedence."))
                .class(theme::ORANGE),
        );
    }

    form = form
        .push(setting_field(
            "Analysis Model",
            &state.config.analysis_model,
            SettingField::AnalysisModel,
        ))
        .push(setting_field(
            "Image Model",
            &state.config.image_model,
            SettingField::ImageModel,
        ))
        .push(setting_field("API Base URL", &state.config.base_url, SettingField::BaseUrl))
        .push(setting_field(
            "Request Timeout (seconds, 0 = none)",
            state.timeout_input,
            SettingField::RequestTimeout,
        ))
        .push(setting_field(
            "Download Directory",
            &state.config.download_dir,
            SettingField::DownloadDir,
        ));

    content = content.push(
        container(widget::column().push(form).spacing(16).padding(24))
            .width(Length::Fill)
            .class(cosmic::theme::Container::Custom(Box::new(theme::canvas_bg))),
    );

    // Save button, only enabled when changes are pending.
    let save_btn = if state.dirty {
        widget::button::suggested("Save Settings").on_press(Message::SaveSettings)
    } else {
        widget::button::standard("Settings Saved")
    };
    content = content.push(save_btn);

    content = content.push(widget::text::caption(state.service_note).class(theme::MUTED_TEXT));

    content.into()
}

/// Renders a labeled text input for a setting field.
fn setting_field<'a>(label: &'a str, value: &'a str, field: SettingField) -> Element<'a, Message> {
    widget::column()
        .push(widget::text::caption(label).class(theme::MUTED_TEXT))
        .push(widget::text_input(label, value).on_input(move |v| Message::UpdateSetting(field, v)))
        .spacing(4)
        .into()
}
