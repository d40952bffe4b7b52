//! Stock middleware.
//!
//! - [`handler_name`] - records the handler name in the context; installed
//!   automatically as the outermost stage of every registered operation
//! - [`request_id`] - generate or propagate a request ID (UUID v7)
//! - [`telemetry`] - tracing span, structured completion log, and metrics

pub mod handler_name;
pub mod request_id;
pub mod telemetry;

pub use handler_name::HandlerNameMiddleware;
pub use request_id::{RequestIdMiddleware, REQUEST_ID_HEADER};
pub use telemetry::TelemetryMiddleware;
