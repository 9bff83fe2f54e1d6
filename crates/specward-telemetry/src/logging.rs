//! Structured logging with JSON or pretty output.
//!
//! Logs go to stderr so that command output on stdout stays machine-readable.

use crate::{LogFormat, TelemetryConfig, TelemetryError};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the logging subsystem.
///
/// Sets up tracing-subscriber with either JSON or pretty format,
/// respecting the configured log level.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    // Build the env filter from config or RUST_LOG
    let filter = build_filter(config)?;

    match config.log_format {
        LogFormat::Json => init_json_logging(filter),
        LogFormat::Pretty => init_pretty_logging(filter),
    }
}

fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.log_level)
        .map_err(|e| TelemetryError::InvalidLevel(config.log_level.clone(), e.to_string()))
}

/// Initialize JSON logging.
fn init_json_logging(filter: EnvFilter) -> Result<(), TelemetryError> {
    let json_layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_current_span(true)
        .with_span_list(false)
        .with_file(false)
        .with_line_number(false)
        .flatten_event(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(json_layer)
        .try_init()
        .map_err(|e: tracing_subscriber::util::TryInitError| {
            TelemetryError::LoggingInit(e.to_string())
        })
}

/// Initialize pretty logging.
fn init_pretty_logging(filter: EnvFilter) -> Result<(), TelemetryError> {
    let pretty_layer = fmt::layer()
        .pretty()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(pretty_layer)
        .try_init()
        .map_err(|e: tracing_subscriber::util::TryInitError| {
            TelemetryError::LoggingInit(e.to_string())
        })
}

/// Standard log event names.
pub mod events {
    /// The process is starting up.
    pub const STARTUP: &str = "startup";

    /// An API document has been loaded.
    pub const SPEC_LOADED: &str = "spec_loaded";

    /// An API document has been reloaded and swapped in.
    pub const SPEC_RELOADED: &str = "spec_reloaded";

    /// Reloading failed; the previous document stays active.
    pub const SPEC_RELOAD_FAILED: &str = "spec_reload_failed";

    /// A response satisfied its declared definition.
    pub const VALIDATION_PASSED: &str = "validation_passed";

    /// A response did not satisfy the document.
    pub const VALIDATION_FAILURE: &str = "validation_failure";
}

/// Helper macros for structured logging with standard fields.
///
/// These wrap the tracing macros to ensure consistent field naming.
#[macro_export]
macro_rules! log_startup {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::STARTUP,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_spec_loaded {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::SPEC_LOADED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_spec_reloaded {
    ($($field:tt)*) => {
        tracing::info!(
            event = $crate::logging::events::SPEC_RELOADED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_spec_reload_failed {
    ($($field:tt)*) => {
        tracing::error!(
            event = $crate::logging::events::SPEC_RELOAD_FAILED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_validation_passed {
    ($($field:tt)*) => {
        tracing::debug!(
            event = $crate::logging::events::VALIDATION_PASSED,
            $($field)*
        )
    };
}

#[macro_export]
macro_rules! log_validation_failure {
    ($($field:tt)*) => {
        tracing::warn!(
            event = $crate::logging::events::VALIDATION_FAILURE,
            $($field)*
        )
    };
}
