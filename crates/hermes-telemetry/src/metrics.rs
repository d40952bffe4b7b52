//! Prometheus metrics for Hermes.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `hermes_requests_total` | Counter | `handler`, `status` | Completed requests |
//! | `hermes_request_duration_seconds` | Histogram | `handler` | Request latency |
//! | `hermes_in_flight_requests` | Gauge | - | Requests being processed |
//! | `hermes_decode_failures_total` | Counter | `handler`, `source` | Rejected request inputs |
//!
//! Recording functions are always safe to call. Until [`init_metrics`] installs
//! a recorder they are no-ops.

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Duration;

/// Counter of completed requests.
pub const REQUESTS_TOTAL: &str = "hermes_requests_total";

/// Histogram of request latency in seconds.
pub const REQUEST_DURATION_SECONDS: &str = "hermes_request_duration_seconds";

/// Gauge of in-flight requests.
pub const IN_FLIGHT_REQUESTS: &str = "hermes_in_flight_requests";

/// Counter of requests whose input could not be decoded.
pub const DECODE_FAILURES_TOTAL: &str = "hermes_decode_failures_total";

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsConfig {
    /// Whether metrics are recorded.
    pub enabled: bool,

    /// Histogram buckets for request duration, in seconds.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_buckets: vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        }
    }
}

/// Installs the global Prometheus recorder.
///
/// Calling this more than once in a process fails with
/// [`TelemetryError::Recorder`].
pub fn init_metrics(config: &MetricsConfig) -> TelemetryResult<()> {
    if !config.enabled {
        return Ok(());
    }

    let mut builder = PrometheusBuilder::new();
    if !config.duration_buckets.is_empty() {
        builder = builder
            .set_buckets_for_metric(
                Matcher::Full(REQUEST_DURATION_SECONDS.to_string()),
                &config.duration_buckets,
            )
            .map_err(|e| TelemetryError::InvalidBuckets(e.to_string()))?;
    }

    let handle = builder
        .install_recorder()
        .map_err(|e| TelemetryError::Recorder(e.to_string()))?;
    let _ = METRICS_HANDLE.set(handle);

    describe_metrics();
    Ok(())
}

/// Renders all metrics in Prometheus text format.
///
/// Returns `None` until [`init_metrics`] has run.
#[must_use]
pub fn render_metrics() -> Option<String> {
    METRICS_HANDLE.get().map(PrometheusHandle::render)
}

fn describe_metrics() {
    describe_counter!(REQUESTS_TOTAL, "Total number of RPC requests processed");
    describe_histogram!(
        REQUEST_DURATION_SECONDS,
        "RPC request duration in seconds"
    );
    describe_gauge!(
        IN_FLIGHT_REQUESTS,
        "Number of RPC requests currently being processed"
    );
    describe_counter!(
        DECODE_FAILURES_TOTAL,
        "Requests rejected because their input could not be decoded"
    );
}

/// Records a completed request.
pub fn record_request(handler: &str, status_code: u16, duration: Duration) {
    counter!(
        REQUESTS_TOTAL,
        "handler" => handler.to_string(),
        "status" => status_code.to_string()
    )
    .increment(1);

    histogram!(
        REQUEST_DURATION_SECONDS,
        "handler" => handler.to_string()
    )
    .record(duration.as_secs_f64());
}

/// Records a request rejected during input decoding.
///
/// `source` is `"query"` or `"body"`.
pub fn record_decode_failure(handler: &str, source: &'static str) {
    counter!(
        DECODE_FAILURES_TOTAL,
        "handler" => handler.to_string(),
        "source" => source
    )
    .increment(1);
}

/// Keeps the in-flight gauge raised while alive.
#[derive(Debug)]
pub struct InFlightGuard {
    _private: (),
}

impl InFlightGuard {
    /// Increments the in-flight gauge.
    #[must_use]
    pub fn new() -> Self {
        gauge!(IN_FLIGHT_REQUESTS).increment(1.0);
        Self { _private: () }
    }
}

impl Default for InFlightGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        gauge!(IN_FLIGHT_REQUESTS).decrement(1.0);
    }
}
