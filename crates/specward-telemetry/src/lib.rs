//! Logging setup for specward.
//!
//! Library crates only emit `tracing` events; the binary calls
//! [`Telemetry::init`] once to install a subscriber.
//!
//! # Usage
//!
//! ```ignore
//! use specward_telemetry::{LogFormat, Telemetry, TelemetryConfig};
//!
//! let config = TelemetryConfig::new()
//!     .with_log_level("info")
//!     .with_log_format(LogFormat::Json);
//!
//! let telemetry = Telemetry::init(config)?;
//! ```

pub mod config;
pub mod logging;

pub use config::{LogFormat, TelemetryConfig};
pub use logging::events;

use thiserror::Error;

/// Telemetry errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to initialize logging.
    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),

    /// The configured log level is not a valid filter directive.
    #[error("invalid log level '{0}': {1}")]
    InvalidLevel(String, String),
}

/// Main telemetry handle.
pub struct Telemetry {
    config: TelemetryConfig,
}

impl Telemetry {
    /// Initialize telemetry with the given configuration.
    ///
    /// Installs the global subscriber; fails if one is already set.
    pub fn init(config: TelemetryConfig) -> Result<Self, TelemetryError> {
        logging::init_logging(&config)?;

        crate::log_startup!(
            service = %config.service_name,
            log_format = %config.log_format,
            "telemetry initialized"
        );

        Ok(Self { config })
    }

    /// Get the telemetry configuration.
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert_eq!(config.service_name, "specward");
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_config_builder() {
        let config = TelemetryConfig::new()
            .with_service_name("contract-tests")
            .with_log_level("debug")
            .with_log_format(LogFormat::Json);

        assert_eq!(config.service_name, "contract-tests");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_format.to_string(), "json");
    }

    #[test]
    fn test_second_init_fails() {
        // Whichever call comes second in this process must fail.
        let first = Telemetry::init(TelemetryConfig::default());
        let second = Telemetry::init(TelemetryConfig::default());
        drop(first);
        assert!(second.is_err());
    }
}
