//! Studio configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/cineframe/studio.toml`
//! - Windows: `%APPDATA%/cineframe/studio.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use cineframe_gemini::client::{DEFAULT_ANALYSIS_MODEL, DEFAULT_BASE_URL, DEFAULT_IMAGE_MODEL};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Studio configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudioConfig {
    /// Gemini API key. May contain a secret, so the file is saved 0600.
    #[serde(default)]
    pub api_key: String,

    /// Model used to describe the reference frame.
    #[serde(default = "default_analysis_model")]
    pub analysis_model: String,

    /// Model used to render the final portrait.
    #[serde(default = "default_image_model")]
    pub image_model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds. 0 disables it.
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,

    /// Starting directory for the save dialog.
    #[serde(default)]
    pub download_dir: String,
}

fn default_analysis_model() -> String {
    DEFAULT_ANALYSIS_MODEL.into()
}

fn default_image_model() -> String {
    DEFAULT_IMAGE_MODEL.into()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.into()
}

fn default_timeout() -> u64 {
    120
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            analysis_model: default_analysis_model(),
            image_model: default_image_model(),
            base_url: default_base_url(),
            request_timeout_secs: default_timeout(),
            download_dir: String::new(),
        }
    }
}

impl StudioConfig {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Saves the current configuration to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&config_path()?)
    }

    fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: StudioConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = StudioConfig::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// API key actually used: the environment wins when set and non-empty.
    pub fn effective_api_key(&self) -> String {
        resolve_api_key(&self.api_key, std::env::var(API_KEY_ENV).ok())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }
}

fn resolve_api_key(stored: &str, env: Option<String>) -> String {
    match env {
        Some(key) if !key.trim().is_empty() => key.trim().to_string(),
        _ => stored.trim().to_string(),
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("cineframe")
            .join("studio.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("cineframe").join("studio.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Ok(PathBuf::from("/tmp/cineframe/studio.toml"))
    }
}
