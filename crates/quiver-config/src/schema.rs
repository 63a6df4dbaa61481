//! Configuration schema types.
//!
//! One struct per section of the configuration file.

use quiver_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};

/// HTTP section: where the service is mounted.
///
/// # Example
///
/// ```
/// use quiver_config::HttpConfig;
///
/// let config = HttpConfig {
///     base_path: "/api/v1".to_string(),
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Prefix prepended to every request path before routing (e.g., "/api").
    #[serde(default = "default_base_path")]
    pub base_path: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
        }
    }
}

fn default_base_path() -> String {
    "/".to_string()
}

/// Docs section: Swagger UI and `openapi.json` hosting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DocsConfig {
    /// Whether the docs host is mounted at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Path the UI and spec are served under.
    #[serde(default = "default_docs_base_path")]
    pub base_path: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_path: default_docs_base_path(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_docs_base_path() -> String {
    "/docs".to_string()
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Whether logging is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Level filter (e.g., "info", "quiver_middleware=debug,warn").
    #[serde(default = "default_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Service name attached to every log line.
    #[serde(default = "default_service_name")]
    pub service_name: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_level(),
            format: LogFormat::default(),
            service_name: default_service_name(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_service_name() -> String {
    "quiver".to_string()
}

impl From<LoggingConfig> for LogConfig {
    fn from(config: LoggingConfig) -> Self {
        let base = match config.format {
            LogFormat::Pretty => Self::development(),
            LogFormat::Json | LogFormat::Compact => Self::production(),
        };

        Self {
            enabled: config.enabled,
            level: config.level,
            format: config.format,
            service_name: config.service_name,
            ..base
        }
    }
}
