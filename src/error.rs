//! Error types and handling for unistore
//!
//! This module defines all error types used throughout the crate.
//! Validation failures are caller mistakes and always propagate; medium
//! failures describe the host environment.

use thiserror::Error;

/// Main error type for unistore operations
#[derive(Debug, Error)]
pub enum UnistoreError {
    #[error("Invalid key: {key} (keys must be a non-empty string or a number)")]
    InvalidKey { key: String },

    #[error("Key collision: '{key}' already exists")]
    KeyCollision { key: String },

    #[error("Storage medium unavailable: {area}")]
    MediumUnavailable { area: String },

    #[error("Storage medium error in {area}: {message}")]
    MediumError { message: String, area: String },

    #[error("Serialization error: {message}")]
    SerializationError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        field: Option<String>,
    },

    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, UnistoreError>;

impl UnistoreError {
    /// Build a medium error for the named area
    pub fn medium(area: impl Into<String>, message: impl Into<String>) -> Self {
        UnistoreError::MediumError {
            message: message.into(),
            area: area.into(),
        }
    }

    /// Check whether the error was caused by the caller rather than the host
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            UnistoreError::InvalidKey { .. } | UnistoreError::KeyCollision { .. }
        )
    }
}

impl From<std::io::Error> for UnistoreError {
    fn from(err: std::io::Error) -> Self {
        UnistoreError::IoError {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<serde_json::Error> for UnistoreError {
    fn from(err: serde_json::Error) -> Self {
        UnistoreError::SerializationError {
            message: err.to_string(),
        }
    }
}
