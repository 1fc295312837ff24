//! Palette and container style overrides.
//!
//! Dark cinematic palette:
//! - Background: gray-900 `#111827`
//! - Surface/cards: gray-800 `#1f2937`
//! - Cyan accent: `#22d3ee` (tailwind cyan-400)
//! - Purple accent: `#a855f7` (tailwind purple-500)
//! - Muted text: gray-400 `#9ca3af`

use cosmic::iced::widget::container as iced_container;
use cosmic::iced::{Background, Border, Color};

use cineframe_pipeline::StageStatus;

/// Cyan accent, complete stages and style keys.
pub const CYAN: Color = Color::from_rgb(0.133, 0.827, 0.933);

/// Purple accent, active stages and style values.
pub const PURPLE: Color = Color::from_rgb(0.659, 0.333, 0.969);

/// Warnings such as an environment override.
pub const ORANGE: Color = Color::from_rgb(0.984, 0.573, 0.235);

/// Error banner text, red-400 `#f87171`.
pub const ERROR_TEXT: Color = Color::from_rgb(0.973, 0.443, 0.443);

/// Main content background.
pub const DARK_BG: Color = Color::from_rgb(0.067, 0.094, 0.153);

/// Sidebar background, slightly darker than main.
pub const SIDEBAR_BG: Color = Color::from_rgb(0.043, 0.059, 0.098);

/// Card / surface background.
pub const SURFACE_BG: Color = Color::from_rgb(0.122, 0.161, 0.216);

/// Muted text and pending stages.
pub const MUTED_TEXT: Color = Color::from_rgb(0.612, 0.639, 0.686);

/// Active/selected nav item highlight.
pub const NAV_ACTIVE: Color = Color::from_rgba(0.133, 0.827, 0.933, 0.15);

const BORDER_COLOR: Color = Color::from_rgba(0.294, 0.333, 0.388, 0.5);

/// Badge color for a stage status.
pub fn status_color(status: StageStatus) -> Color {
    match status {
        StageStatus::Pending => MUTED_TEXT,
        StageStatus::Active => PURPLE,
        StageStatus::Complete => CYAN,
    }
}

/// Card container style.
pub fn canvas_bg(_theme: &cosmic::Theme) -> iced_container::Style {
    iced_container::Style {
        background: Some(Background::Color(SURFACE_BG)),
        border: Border {
            color: BORDER_COLOR,
            width: 1.0,
            radius: 8.0.into(),
        },
        ..Default::default()
    }
}

/// Stage card style; the border follows the stage status.
pub fn stage_card(status: StageStatus) -> impl Fn(&cosmic::Theme) -> iced_container::Style {
    move |_theme| {
        let accent = status_color(status);
        iced_container::Style {
            background: Some(Background::Color(SURFACE_BG)),
            border: Border {
                color: match status {
                    StageStatus::Pending => BORDER_COLOR,
                    _ => Color { a: 0.6, ..accent },
                },
                width: 1.0,
                radius: 10.0.into(),
            },
            ..Default::default()
        }
    }
}

/// Dashed-looking placeholder used by empty upload slots and the output panel.
pub fn placeholder_bg(_theme: &cosmic::Theme) -> iced_container::Style {
    iced_container::Style {
        background: Some(Background::Color(Color::from_rgba(0.0, 0.0, 0.0, 0.25))),
        border: Border {
            color: BORDER_COLOR,
            width: 2.0,
            radius: 8.0.into(),
        },
        ..Default::default()
    }
}

/// Error banner style.
pub fn error_bg(_theme: &cosmic::Theme) -> iced_container::Style {
    iced_container::Style {
        background: Some(Background::Color(Color::from_rgba(0.498, 0.114, 0.114, 0.35))),
        border: Border {
            color: Color { a: 0.6, ..ERROR_TEXT },
            width: 1.0,
            radius: 8.0.into(),
        },
        ..Default::default()
    }
}

/// Style viewer background.
pub fn code_bg(_theme: &cosmic::Theme) -> iced_container::Style {
    iced_container::Style {
        background: Some(Background::Color(Color::from_rgba(0.0, 0.0, 0.0, 0.35))),
        border: Border {
            radius: 6.0.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Sidebar container style.
pub fn sidebar_bg(_theme: &cosmic::Theme) -> iced_container::Style {
    iced_container::Style {
        background: Some(Background::Color(SIDEBAR_BG)),
        border: Border {
            width: 0.0,
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Active nav item background.
pub fn nav_active_bg(_theme: &cosmic::Theme) -> iced_container::Style {
    iced_container::Style {
        background: Some(Background::Color(NAV_ACTIVE)),
        border: Border {
            radius: 6.0.into(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Content area background.
pub fn content_bg(_theme: &cosmic::Theme) -> iced_container::Style {
    iced_container::Style {
        background: Some(Background::Color(DARK_BG)),
        ..Default::default()
    }
}
