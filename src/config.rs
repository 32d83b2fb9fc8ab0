//! Application configuration.
//!
//! Loaded from `config.toml` in the platform config directory when present,
//! otherwise defaults are used. A malformed file is never fatal.

use serde::Deserialize;
use std::path::PathBuf;
use tracing::warn;

/// Default base URL of the modern-numeral conversion service.
pub const DEFAULT_API_BASE_URL: &str = "https://romans.justyy.workers.dev";

/// Runtime configuration.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the modern-numeral conversion service.
    pub api_base_url: String,
    /// Timeout applied to conversion requests, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Returns the path of the config file, e.g. `~/.config/romancalc/config.toml`.
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("romancalc/config.toml"))
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if the file is
    /// missing or invalid.
    pub fn load() -> Self {
        let Some(path) = config_file_path() else {
            return Self::default();
        };
        let Ok(contents) = std::fs::read_to_string(&path) else {
            return Self::default();
        };
        Self::parse(&contents).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "invalid config file, using defaults");
            Self::default()
        })
    }

    /// Parse a TOML configuration document.
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}
