//! Configuration management for unistore
//!
//! This module handles loading and validating configuration from TOML files
//! and `UNISTORE_` prefixed environment variables.

use crate::error::{Result, UnistoreError};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "UNISTORE_";

/// Longest cookie lifetime browsers honour
pub const MAX_COOKIE_LIFETIME_DAYS: u32 = 400;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Storage configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Lifetime of persistent cookies written by the cookie area
    pub cookie_lifetime_days: u32,
    /// `path` attribute of cookies written by the cookie area
    pub cookie_path: String,
    /// Back the durable area with cookies when `localStorage` is missing
    pub cookie_fallback: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cookie_lifetime_days: 365,
            cookie_path: "/".to_string(),
            cookie_fallback: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = UnistoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            _ => Err(UnistoreError::ConfigError {
                message: format!("Invalid log format: {s}"),
                field: Some("logging.format".to_string()),
            }),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file; missing fields use defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| UnistoreError::IoError {
            message: format!("Failed to read config file {}: {e}", path.display()),
            source: Some(e),
        })?;

        toml::from_str(&content).map_err(|e| UnistoreError::ConfigError {
            message: format!("Failed to parse config file {}: {e}", path.display()),
            field: None,
        })
    }

    /// Load the default configuration with environment overrides applied
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Defaults, then the optional file, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `UNISTORE_*` environment variables on top of this configuration
    pub fn apply_env(&mut self) -> Result<()> {
        if let Some(days) = env_var("STORAGE_COOKIE_LIFETIME_DAYS") {
            self.storage.cookie_lifetime_days =
                parse_env(&days, "storage.cookie_lifetime_days")?;
        }
        if let Some(path) = env_var("STORAGE_COOKIE_PATH") {
            self.storage.cookie_path = path;
        }
        if let Some(fallback) = env_var("STORAGE_COOKIE_FALLBACK") {
            self.storage.cookie_fallback = parse_env(&fallback, "storage.cookie_fallback")?;
        }
        if let Some(level) = env_var("LOGGING_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = env_var("LOGGING_FORMAT") {
            self.logging.format = format.parse()?;
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.cookie_lifetime_days == 0 {
            return Err(UnistoreError::ConfigError {
                message: "Cookie lifetime must be at least one day".to_string(),
                field: Some("storage.cookie_lifetime_days".to_string()),
            });
        }

        if self.storage.cookie_lifetime_days > MAX_COOKIE_LIFETIME_DAYS {
            return Err(UnistoreError::ConfigError {
                message: format!(
                    "Cookie lifetime must be at most {MAX_COOKIE_LIFETIME_DAYS} days: {}",
                    self.storage.cookie_lifetime_days
                ),
                field: Some("storage.cookie_lifetime_days".to_string()),
            });
        }

        if !self.storage.cookie_path.starts_with('/') {
            return Err(UnistoreError::ConfigError {
                message: format!(
                    "Cookie path must start with '/': {}",
                    self.storage.cookie_path
                ),
                field: Some("storage.cookie_path".to_string()),
            });
        }

        if self.storage.cookie_path.contains(';') {
            return Err(UnistoreError::ConfigError {
                message: "Cookie path must not contain ';'".to_string(),
                field: Some("storage.cookie_path".to_string()),
            });
        }

        crate::logging::parse_log_level(&self.logging.level)?;

        Ok(())
    }
}

fn env_var(suffix: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}{suffix}")).ok()
}

fn parse_env<T: std::str::FromStr>(raw: &str, field: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| UnistoreError::ConfigError {
        message: format!("Invalid value for {field}: {raw}"),
        field: Some(field.to_string()),
    })
}
