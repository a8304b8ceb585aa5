//! Configuration management (config.toml)
//!
//! Handles loading, saving, and providing defaults for dashboard settings.
//! Settings are stored in TOML format in the platform-specific config directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Dashboard configuration.
///
/// Serialized to/from TOML format for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Catalog API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Window and link settings
    #[serde(default)]
    pub ui: UiConfig,
}

/// Catalog API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the catalog server, without the `/api/developer` path
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (default: 15)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// UI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Link opened by the "contact administration" button
    #[serde(default = "default_admin_contact_url")]
    pub admin_contact_url: String,
    /// Whether to start in fullscreen mode (default: false)
    #[serde(default)]
    pub fullscreen: bool,
    /// Initial window width in points (default: 480)
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    /// Initial window height in points (default: 800)
    #[serde(default = "default_window_height")]
    pub window_height: f32,
}

fn default_base_url() -> String {
    "https://nebula-server-ypun.onrender.com".to_string()
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_admin_contact_url() -> String {
    "https://t.me/admin_contact".to_string()
}
fn default_window_width() -> f32 {
    480.0
}
fn default_window_height() -> f32 {
    800.0
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            admin_contact_url: default_admin_contact_url(),
            fullscreen: false,
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

/// One-off settings from the command line. They shape a single run and are
/// never written back to `config.toml`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    /// Catalog API base URL to use instead of the configured one
    pub api_url: Option<String>,
    /// Start fullscreen regardless of the saved setting
    pub fullscreen: bool,
}

impl Overrides {
    /// Settings in effect for this run; `config` itself is left untouched.
    pub fn apply(&self, config: &Config) -> Config {
        let mut effective = config.clone();
        if let Some(api_url) = &self.api_url {
            effective.api.base_url = api_url.clone();
        }
        if self.fullscreen {
            effective.ui.fullscreen = true;
        }
        effective
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\Nebula\Dashboard\config`
/// On macOS: `~/Library/Application Support/io.nebula.Dashboard`
/// On Linux: `~/.config/dashboard`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io", "nebula", "Dashboard")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Path of `config.toml` in the platform configuration directory.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Loads the configuration from disk.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    if !path.exists() {
        return Config::default();
    }
    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring config at {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Loads the configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Saves the configuration to the platform configuration directory.
pub fn save(config: &Config) -> Result<(), ConfigError> {
    match config_path() {
        Some(path) => save_to(config, &path),
        None => Ok(()),
    }
}

/// Saves the configuration to an explicit path, creating parent directories.
pub fn save_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}
