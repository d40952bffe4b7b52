//! Configuration sections.
//!
//! Every field has a default, so a file only needs the values it changes.
//! Unknown fields are rejected.

use serde::{Deserialize, Serialize};

/// HTTP server section.
///
/// ```
/// use hermes_config::ServerSection;
///
/// let section = ServerSection {
///     http_addr: "127.0.0.1:3000".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(section.request_timeout_ms, 30_000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    /// Bind address, e.g. `"0.0.0.0:8080"`.
    #[serde(default = "default_http_addr")]
    pub http_addr: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Graceful shutdown timeout in seconds.
    #[serde(default = "default_shutdown_timeout_secs")]
    pub shutdown_timeout_secs: u64,

    /// HTTP/1.1 keep-alive.
    #[serde(default = "default_true")]
    pub keep_alive: bool,

    /// Largest accepted request body in bytes.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            http_addr: default_http_addr(),
            request_timeout_ms: default_request_timeout_ms(),
            shutdown_timeout_secs: default_shutdown_timeout_secs(),
            keep_alive: true,
            max_body_size: default_max_body_size(),
        }
    }
}

fn default_http_addr() -> String {
    hermes_server::config::DEFAULT_HTTP_ADDR.to_string()
}

fn default_request_timeout_ms() -> u64 {
    hermes_server::config::DEFAULT_REQUEST_TIMEOUT_SECS * 1000
}

fn default_shutdown_timeout_secs() -> u64 {
    hermes_server::config::DEFAULT_SHUTDOWN_TIMEOUT_SECS
}

fn default_max_body_size() -> usize {
    hermes_server::config::DEFAULT_MAX_BODY_SIZE
}

/// Log output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Multi-line human-readable output.
    Pretty,
    /// Single-line human-readable output.
    Compact,
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingSection {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Filter directive, e.g. `"info"` or `"hermes_rpc=debug,hyper=warn"`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Log span open and close events.
    #[serde(default)]
    pub span_events: bool,

    /// Include source file and line.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            span_events: false,
            include_location: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Metrics section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Record request metrics.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Histogram buckets for request duration, in seconds.
    #[serde(default = "default_duration_buckets")]
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_buckets: default_duration_buckets(),
        }
    }
}

fn default_duration_buckets() -> Vec<f64> {
    hermes_telemetry::MetricsConfig::default().duration_buckets
}

/// Documentation endpoint section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct DocsSection {
    /// Mount the documentation endpoint.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Path the endpoint is mounted at.
    #[serde(default = "default_docs_path")]
    pub path: String,
}

impl Default for DocsSection {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_docs_path(),
        }
    }
}

fn default_docs_path() -> String {
    "/rpc/docs".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_section_defaults() {
        let section = ServerSection::default();
        assert_eq!(section.http_addr, "0.0.0.0:8080");
        assert_eq!(section.request_timeout_ms, 30_000);
        assert_eq!(section.shutdown_timeout_secs, 30);
        assert!(section.keep_alive);
        assert_eq!(section.max_body_size, 1024 * 1024);
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let section: LoggingSection = toml::from_str(r#"level = "debug""#).unwrap();
        assert_eq!(section.level, "debug");
        assert!(section.enabled);
        assert_eq!(section.format, LogFormat::Json);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<DocsSection, _> = toml::from_str(r#"route = "/docs""#);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("route"));
    }

    #[test]
    fn test_log_format_names() {
        let section: LoggingSection = serde_json::from_str(r#"{"format": "pretty"}"#).unwrap();
        assert_eq!(section.format, LogFormat::Pretty);
        let section: LoggingSection = serde_json::from_str(r#"{"format": "compact"}"#).unwrap();
        assert_eq!(section.format, LogFormat::Compact);
        assert!(serde_json::from_str::<LoggingSection>(r#"{"format": "xml"}"#).is_err());
    }
}
