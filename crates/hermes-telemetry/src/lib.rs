//! Observability for Hermes services.
//!
//! - **Logging**: `tracing` events rendered by `tracing-subscriber` as JSON,
//!   pretty or compact text
//! - **Metrics**: counters, gauges and histograms through the `metrics`
//!   facade, exported in Prometheus text format
//!
//! Both are process-wide and installed once at startup:
//!
//! ```rust,ignore
//! use hermes_telemetry::{init_logging, init_metrics, LogConfig, MetricsConfig};
//!
//! init_logging(&LogConfig::development())?;
//! init_metrics(&MetricsConfig::default())?;
//!
//! // later, from a scrape endpoint
//! let body = hermes_telemetry::render_metrics().unwrap_or_default();
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{init_logging, parse_filter, LogConfig, LogFormat};
pub use self::metrics::{init_metrics, render_metrics, MetricsConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
