//! TOML-based application configuration.
//!
//! Stores automation cadence, oracle settings, and notification
//! toggles at `~/.config/inboxpilot/config.toml`. Credentials never
//! live here; they stay in the OS keyring.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/inboxpilot[-dev]/` based on INBOXPILOT_ENV.
///
/// Set INBOXPILOT_ENV=dev to use a development data directory.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("INBOXPILOT_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("inboxpilot-dev")
    } else {
        base_dir.join("inboxpilot")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(e.to_string()))?;
    Ok(dir)
}

/// Automation loop cadence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationConfig {
    /// Seconds between successful cycles.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Seconds to sleep after a failed cycle before retrying.
    #[serde(default = "default_error_backoff")]
    pub error_backoff_secs: u64,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval(),
            error_backoff_secs: default_error_backoff(),
        }
    }
}

/// Classification oracle settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_oracle_url")]
    pub base_url: String,
    #[serde(default = "default_oracle_model")]
    pub model: String,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_oracle_url(),
            model: default_oracle_model(),
        }
    }
}

/// Notification channel toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub desktop_toast: bool,
    #[serde(default)]
    pub webhook: bool,
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            desktop_toast: true,
            webhook: false,
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/inboxpilot/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub automation: AutomationConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    /// Override for the events file (defaults to `<data_dir>/events.json`).
    #[serde(default)]
    pub events_path: Option<PathBuf>,
    /// Whether scheduled events are mirrored to the tracking board.
    #[serde(default = "default_true")]
    pub mirror_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            automation: AutomationConfig::default(),
            oracle: OracleConfig::default(),
            notifications: NotificationsConfig::default(),
            events_path: None,
            mirror_enabled: true,
        }
    }
}

// Default functions
fn default_poll_interval() -> u64 {
    300
}
fn default_error_backoff() -> u64 {
    60
}
fn default_true() -> bool {
    true
}
fn default_oracle_url() -> String {
    crate::integrations::ollama::DEFAULT_BASE_URL.to_string()
}
fn default_oracle_model() -> String {
    crate::integrations::ollama::DEFAULT_MODEL.to_string()
}

impl Config {
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load configuration, falling back to defaults when the file is
    /// absent.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Resolved path of the events file.
    pub fn events_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.events_path {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("events.json")),
        }
    }

    /// Resolved path of the streak file.
    pub fn streak_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("streak.json"))
    }
}
