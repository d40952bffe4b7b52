//! Telemetry middleware.
//!
//! Opens a `tracing` span per request, logs one structured event when the
//! response is ready, and records the standard metrics from
//! [`hermes_telemetry::metrics`]:
//!
//! - `hermes_requests_total{handler, status}`
//! - `hermes_request_duration_seconds{handler}`
//! - `hermes_in_flight_requests`
//!
//! Register it after the handler name stage (the default position for
//! registrar-wide middleware) so the span and metrics carry the handler name.

use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};
use hermes_core::RpcContext;
use hermes_telemetry::metrics::{self, InFlightGuard};
use std::time::Instant;
use tracing::Instrument;

const UNKNOWN_HANDLER: &str = "unknown";

/// Emits a span, a completion log line, and request metrics.
#[derive(Debug, Clone)]
pub struct TelemetryMiddleware {
    record_metrics: bool,
}

impl TelemetryMiddleware {
    /// Creates the middleware with metrics recording enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            record_metrics: true,
        }
    }

    /// Disables metrics recording; spans and logs are still emitted.
    #[must_use]
    pub fn without_metrics(mut self) -> Self {
        self.record_metrics = false;
        self
    }
}

impl Default for TelemetryMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl Middleware for TelemetryMiddleware {
    fn name(&self) -> &'static str {
        "telemetry"
    }

    fn process<'a>(
        &'a self,
        ctx: RpcContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        let handler = ctx.handler_name().unwrap_or(UNKNOWN_HANDLER);
        let request_id = ctx.request_id().map(|id| id.to_string());
        let span = tracing::info_span!(
            "rpc",
            handler,
            method = %request.method(),
            path = %request.uri().path(),
            request_id = request_id.as_deref().unwrap_or_default(),
        );

        Box::pin(
            async move {
                let _in_flight = self.record_metrics.then(InFlightGuard::new);
                let start = Instant::now();

                let response = next.run(ctx, request).await;

                let duration = start.elapsed();
                let status = response.status().as_u16();
                if self.record_metrics {
                    metrics::record_request(handler, status, duration);
                }

                if response.status().is_server_error() {
                    tracing::warn!(
                        http.status_code = status,
                        duration_ms = duration.as_secs_f64() * 1000.0,
                        "request failed"
                    );
                } else {
                    tracing::info!(
                        http.status_code = status,
                        duration_ms = duration.as_secs_f64() * 1000.0,
                        "request completed"
                    );
                }

                response
            }
            .instrument(span),
        )
    }
}
