//! The root configuration type.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use hermes_server::ServerConfig;
use hermes_telemetry::{LogConfig, MetricsConfig};

use crate::{ConfigError, DocsSection, LogFormat, LoggingSection, MetricsSection, ServerSection};

/// Complete Hermes service configuration.
///
/// Load it with [`ConfigLoader`](crate::ConfigLoader), then hand the pieces to
/// the crates that use them:
///
/// ```
/// use hermes_config::HermesConfig;
///
/// let config = HermesConfig::default();
/// let server = config.server_config();
/// assert_eq!(server.http_addr(), "0.0.0.0:8080");
/// assert_eq!(config.docs.path, "/rpc/docs");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HermesConfig {
    /// Service name attached to log output.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSection,

    /// Metrics settings.
    #[serde(default)]
    pub metrics: MetricsSection,

    /// Documentation endpoint settings.
    #[serde(default)]
    pub docs: DocsSection,
}

impl Default for HermesConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            server: ServerSection::default(),
            logging: LoggingSection::default(),
            metrics: MetricsSection::default(),
            docs: DocsSection::default(),
        }
    }
}

fn default_service_name() -> String {
    "hermes".to_string()
}

impl HermesConfig {
    /// Defaults tuned for local work: pretty debug logs with source
    /// locations.
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.span_events = true;
        config.logging.include_location = true;
        config
    }

    /// Defaults for deployed services: JSON logs at info level.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config
    }

    /// Checks values that deserialize fine but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.trim().is_empty() {
            return Err(ConfigError::invalid_value("service_name", "must not be empty"));
        }

        if self
            .server
            .http_addr
            .parse::<std::net::SocketAddr>()
            .is_err()
        {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        if self.server.request_timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "server.request_timeout_ms",
                "must be greater than zero",
            ));
        }

        if self.logging.enabled
            && hermes_telemetry::parse_filter(&self.logging.level).is_err()
        {
            return Err(ConfigError::invalid_value(
                "logging.level",
                format!("invalid filter directive: {}", self.logging.level),
            ));
        }

        let buckets = &self.metrics.duration_buckets;
        if self.metrics.enabled
            && (buckets.is_empty() || buckets.windows(2).any(|pair| pair[0] >= pair[1]))
        {
            return Err(ConfigError::invalid_value(
                "metrics.duration_buckets",
                "must be non-empty and strictly increasing",
            ));
        }

        if self.docs.enabled && !self.docs.path.starts_with('/') {
            return Err(ConfigError::invalid_value(
                "docs.path",
                "must start with '/'",
            ));
        }

        Ok(())
    }

    /// The server settings as a [`ServerConfig`].
    #[must_use]
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::builder()
            .http_addr(self.server.http_addr.clone())
            .request_timeout(Duration::from_millis(self.server.request_timeout_ms))
            .shutdown_timeout(Duration::from_secs(self.server.shutdown_timeout_secs))
            .keep_alive(self.server.keep_alive)
            .max_body_size(self.server.max_body_size)
            .build()
    }

    /// The logging settings as a [`LogConfig`].
    #[must_use]
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.logging.enabled,
            level: self.logging.level.clone(),
            format: match self.logging.format {
                LogFormat::Json => hermes_telemetry::LogFormat::Json,
                LogFormat::Pretty => hermes_telemetry::LogFormat::Pretty,
                LogFormat::Compact => hermes_telemetry::LogFormat::Compact,
            },
            span_events: self.logging.span_events,
            file_line_info: self.logging.include_location,
            service_name: self.service_name.clone(),
        }
    }

    /// The metrics settings as a [`MetricsConfig`].
    #[must_use]
    pub fn metrics_config(&self) -> MetricsConfig {
        MetricsConfig {
            enabled: self.metrics.enabled,
            duration_buckets: self.metrics.duration_buckets.clone(),
        }
    }
}
