//! Structured logging for Quiver services.
//!
//! Installs the process-wide `tracing` subscriber. Everything the middleware
//! logs, including the per-request access line, goes through it.
//!
//! # Example
//!
//! ```rust,no_run
//! use quiver_telemetry::{init_logging, LogConfig};
//!
//! let config = LogConfig::production();
//! init_logging(&config)?;
//!
//! // Create loggers after the subscriber is installed.
//! let logger = config.service_logger();
//! logger.in_scope(|| tracing::info!("service started"));
//! # Ok::<(), quiver_telemetry::TelemetryError>(())
//! ```

use crate::error::{TelemetryError, TelemetryResult};
use quiver_core::Logger;
use serde::{Deserialize, Serialize};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Multi-line, human-readable output.
    Pretty,
    /// Single-line, human-readable output.
    Compact,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether logging is enabled.
    pub enabled: bool,

    /// Level filter (e.g., "info", "quiver_middleware=debug,info").
    pub level: String,

    /// Output format.
    pub format: LogFormat,

    /// Whether to include target (module path).
    pub include_target: bool,

    /// Whether to include file/line info.
    pub file_line_info: bool,

    /// Service name attached to every event via the service logger.
    pub service_name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::production()
    }
}

impl LogConfig {
    /// Creates a development configuration with human-readable output.
    #[must_use]
    pub fn development() -> Self {
        Self {
            enabled: true,
            level: "debug".to_string(),
            format: LogFormat::Pretty,
            include_target: true,
            file_line_info: true,
            service_name: "quiver".to_string(),
        }
    }

    /// Creates a production configuration with JSON output.
    #[must_use]
    pub fn production() -> Self {
        Self {
            enabled: true,
            level: "info".to_string(),
            format: LogFormat::Json,
            include_target: true,
            file_line_info: false,
            service_name: "quiver".to_string(),
        }
    }

    /// Creates the base logger for this service.
    ///
    /// Call after [`init_logging`]: a logger created before a subscriber
    /// exists stays silent.
    #[must_use]
    pub fn service_logger(&self) -> Logger {
        if self.enabled {
            Logger::root(&self.service_name)
        } else {
            Logger::disabled()
        }
    }
}

/// Installs the global subscriber described by `config`.
///
/// Does nothing when logging is disabled.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidLevel`] if the level filter does not
/// parse, and [`TelemetryError::AlreadyInitialized`] if a global subscriber
/// is already installed.
pub fn init_logging(config: &LogConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let filter = create_env_filter(&config.level)?;

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
            .with_filter(filter)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
            .with_filter(filter)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_file(config.file_line_info)
            .with_line_number(config.file_line_info)
            .with_target(config.include_target)
            .with_filter(filter)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .map_err(|_| TelemetryError::AlreadyInitialized)
}

/// Creates an env filter from a string.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidLevel`] if the filter string is invalid.
pub fn create_env_filter(filter: &str) -> TelemetryResult<EnvFilter> {
    EnvFilter::try_new(filter).map_err(|e| TelemetryError::InvalidLevel {
        level: filter.to_string(),
        reason: e.to_string(),
    })
}
