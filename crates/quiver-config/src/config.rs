//! Root configuration type.

use crate::{ConfigError, DocsConfig, HttpConfig, LoggingConfig};
use quiver_core::join_path;
use quiver_telemetry::LogFormat;
use serde::{Deserialize, Serialize};

/// Complete configuration for a Quiver middleware stack.
///
/// # Example
///
/// ```
/// use quiver_config::QuiverConfig;
///
/// let config = QuiverConfig::default();
/// assert_eq!(config.http.base_path, "/");
/// assert_eq!(config.docs.base_path, "/docs");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct QuiverConfig {
    /// Base-path rewriting.
    #[serde(default)]
    pub http: HttpConfig,

    /// Swagger UI hosting.
    #[serde(default)]
    pub docs: DocsConfig,

    /// Logging.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl QuiverConfig {
    /// Validate the configuration.
    ///
    /// Base paths must be rooted and must join cleanly with a route. The log
    /// level must parse as a filter directive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_base_path("http.base_path", &self.http.base_path)?;

        if self.docs.enabled {
            validate_base_path("docs.base_path", &self.docs.base_path)?;
        }

        if self.logging.service_name.is_empty() {
            return Err(ConfigError::invalid_value(
                "logging.service_name",
                "must not be empty",
            ));
        }

        quiver_telemetry::create_env_filter(&self.logging.level)
            .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;

        Ok(())
    }

    /// Development preset: debug level, pretty output.
    ///
    /// ```
    /// use quiver_config::QuiverConfig;
    ///
    /// let config = QuiverConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config
    }

    /// Production preset: info level, JSON output.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config
    }
}

fn validate_base_path(field: &str, path: &str) -> Result<(), ConfigError> {
    if !path.starts_with('/') {
        return Err(ConfigError::invalid_value(field, "must start with '/'"));
    }

    join_path(path, &[]).map_err(|e| ConfigError::invalid_value(field, e.to_string()))?;
    Ok(())
}
