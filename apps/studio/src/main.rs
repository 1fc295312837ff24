//! Cineframe Studio entry point.

mod app;
mod bridge;
mod config;
mod download;
mod message;
mod theme;
mod views;

use cosmic::iced::Size;
use tracing_subscriber::EnvFilter;

use config::StudioConfig;

fn main() -> cosmic::iced::Result {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "cineframe studio starting");

    let settings = cosmic::app::Settings::default().size(Size::new(1200.0, 820.0));
    cosmic::app::run::<app::Studio>(settings, load_config())
}

/// Falls back to defaults when the file cannot be read or parsed.
fn load_config() -> StudioConfig {
    let config = StudioConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "config unreadable, falling back to defaults");
        StudioConfig::default()
    });
    tracing::info!(
        analysis_model = %config.analysis_model,
        image_model = %config.image_model,
        has_key = !config.effective_api_key().is_empty(),
        "configuration ready"
    );
    config
}
