//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/solena/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/solena/` (~/.config/solena/)
//! - Data: `$XDG_DATA_HOME/solena/` (~/.local/share/solena/)
//! - State/Logs: `$XDG_STATE_HOME/solena/` (~/.local/state/solena/)

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Avatar session provider configuration
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

/// Avatar session provider configuration
///
/// When enabled, recordings and transcripts for completed sessions can be
/// pulled from the provider and merged into stored conversations.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProviderConfig {
    /// Enable/disable provider sync
    #[serde(default)]
    pub enabled: bool,

    /// Provider API base URL (e.g., `https://sessions.example.com/v1`)
    pub base_url: Option<String>,

    /// API key (from the provider dashboard)
    pub api_key: Option<String>,
}

impl ProviderConfig {
    /// Check if the provider is properly configured and enabled
    pub fn is_ready(&self) -> bool {
        self.enabled && self.base_url.is_some() && self.api_key.is_some()
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        if self.base_url.is_none() {
            return Err(Error::Config(
                "provider.base_url is required when provider is enabled".to_string(),
            ));
        }
        if self.api_key.is_none() {
            return Err(Error::Config(
                "provider.api_key is required when provider is enabled".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/solena/config.toml` (~/.config/solena/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("solena").join("config.toml")
    }

    /// Returns the data directory path (for the record store database)
    ///
    /// `$XDG_DATA_HOME/solena/` (~/.local/share/solena/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("solena")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/solena/` (~/.local/state/solena/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("solena")
    }

    /// Returns the record store database path
    ///
    /// `$XDG_DATA_HOME/solena/records.db` (~/.local/share/solena/records.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("records.db")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/solena/solena.log` (~/.local/state/solena/solena.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("solena.log")
    }
}
