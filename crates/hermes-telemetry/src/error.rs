//! Telemetry error types.

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::util::TryInitError;

/// Errors raised while installing logging or metrics.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// The log filter directive does not parse.
    #[error("invalid log filter {directive:?}: {source}")]
    InvalidFilter {
        /// The rejected directive.
        directive: String,
        /// Parser error.
        #[source]
        source: ParseError,
    },

    /// A global subscriber could not be installed, usually because one
    /// already is.
    #[error("failed to install the tracing subscriber: {0}")]
    Subscriber(#[from] TryInitError),

    /// The Prometheus histogram buckets were rejected.
    #[error("invalid histogram buckets: {0}")]
    InvalidBuckets(String),

    /// A global metrics recorder could not be installed.
    #[error("failed to install the metrics recorder: {0}")]
    Recorder(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_filter_names_directive() {
        let source = tracing_subscriber::EnvFilter::try_new("hermes=loud").unwrap_err();
        let err = TelemetryError::InvalidFilter {
            directive: "hermes=loud".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("invalid log filter \"hermes=loud\""));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_recorder_display() {
        let err = TelemetryError::Recorder("already installed".to_string());
        assert_eq!(
            err.to_string(),
            "failed to install the metrics recorder: already installed"
        );
    }
}
