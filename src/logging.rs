//! Structured logging setup for unistore
//!
//! The library itself only emits `tracing` events. Applications that want
//! them on a console call [`init_logging`] once at startup.

use crate::config::{LogFormat, LoggingConfig};
use crate::error::{Result, UnistoreError};
use tracing::{info, warn, Level};
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Parse a log level string to a tracing `Level`
pub fn parse_log_level(level_str: &str) -> Result<Level> {
    match level_str.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(UnistoreError::ConfigError {
            message: format!("Invalid log level: {level_str}"),
            field: Some("logging.level".to_string()),
        }),
    }
}

/// Build the env filter, letting `RUST_LOG` override the configured level
pub fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let level = parse_log_level(&config.level)?;
    Ok(EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy())
}

/// Install a global tracing subscriber for the configured format.
///
/// A subscriber that is already installed is left in place and reported
/// with a warning.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = build_env_filter(config)?;
    let registry = Registry::default().with(env_filter);

    let installed = match config.format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_target(true),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_target(true)
                    .with_file(false),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(
                fmt::layer()
                    .compact()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_target(false),
            )
            .try_init(),
    };

    if let Err(e) = installed {
        warn!(
            "Failed to initialize tracing subscriber (may already be set): {}",
            e
        );
        return Ok(());
    }

    info!(
        "Logging initialized with level {} and {:?} format",
        config.level, config.format
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
        assert_eq!(parse_log_level("DEBUG").unwrap(), Level::DEBUG);
        assert_eq!(parse_log_level("Warn").unwrap(), Level::WARN);
        assert!(parse_log_level("verbose").is_err());
    }

    #[test]
    fn test_build_env_filter_rejects_bad_level() {
        let config = LoggingConfig {
            level: "chatty".to_string(),
            format: LogFormat::Compact,
        };
        assert!(build_env_filter(&config).is_err());
    }

    #[test]
    fn test_init_logging_twice_is_not_an_error() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            format: LogFormat::Compact,
        };
        assert!(init_logging(&config).is_ok());
        assert!(init_logging(&config).is_ok());
    }
}
