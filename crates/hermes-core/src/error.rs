//! Error types for Hermes.
//!
//! [`RpcError`] is the only error shape that ever reaches a client. It pairs an
//! HTTP status code with a message and serializes as:
//!
//! ```json
//! {"HTTPCode": 503, "Message": "backend unavailable"}
//! ```
//!
//! Handlers return `anyhow::Error`. When the error (or anything in its source
//! chain) is an `RpcError`, its status and message are surfaced verbatim.
//! Everything else is treated as an internal failure and reported as the
//! generic [`RpcError::internal`] value.
//!
//! # Example
//!
//! ```
//! use hermes_core::RpcError;
//! use http::StatusCode;
//!
//! let err = RpcError::new(StatusCode::SERVICE_UNAVAILABLE, "backend unavailable");
//! assert!(err.is_server_error());
//! assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
//!
//! let wrapped = anyhow::Error::new(err.clone()).context("loading profile");
//! assert_eq!(RpcError::find(&wrapped), Some(&err));
//! ```

use bytes::Bytes;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Message used for every internal failure that is not an [`RpcError`].
pub const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal Server Error";

/// Result type alias using [`RpcError`].
pub type RpcResult<T> = Result<T, RpcError>;

/// An error with an HTTP status code and a client-facing message.
///
/// The `Display` implementation is the message alone, so wrapping an
/// `RpcError` in `anyhow` context keeps the original text intact.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct RpcError {
    /// HTTP status code returned to the client.
    #[serde(rename = "HTTPCode")]
    pub http_code: u16,

    /// Message returned to the client.
    #[serde(rename = "Message")]
    pub message: String,
}

impl RpcError {
    /// Creates a new error with the given status and message.
    #[must_use]
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            http_code: status.as_u16(),
            message: message.into(),
        }
    }

    /// The generic internal error: `500 Internal Server Error`.
    #[must_use]
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_SERVER_ERROR_MESSAGE,
        )
    }

    /// Creates a `400 Bad Request` error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Creates a `404 Not Found` error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Creates a `405 Method Not Allowed` error.
    #[must_use]
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, message)
    }

    /// Creates a `413 Payload Too Large` error.
    #[must_use]
    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(StatusCode::PAYLOAD_TOO_LARGE, message)
    }

    /// Creates a `503 Service Unavailable` error.
    #[must_use]
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }

    /// Creates a `504 Gateway Timeout` error.
    #[must_use]
    pub fn gateway_timeout(message: impl Into<String>) -> Self {
        Self::new(StatusCode::GATEWAY_TIMEOUT, message)
    }

    /// Returns true for statuses in `400..=499`.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.http_code)
    }

    /// Returns true for statuses in `500..=599`.
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.http_code)
    }

    /// Returns true if the code lies in the HTTP status range `100..=599`.
    #[must_use]
    pub fn has_valid_status(&self) -> bool {
        (100..600).contains(&self.http_code)
    }

    /// Returns the status code to respond with.
    ///
    /// Codes outside `100..=599` map to `500`.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        if !self.has_valid_status() {
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
        StatusCode::from_u16(self.http_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Finds the first `RpcError` in the source chain of `err`.
    #[must_use]
    pub fn find(err: &anyhow::Error) -> Option<&RpcError> {
        err.chain().find_map(|cause| cause.downcast_ref::<RpcError>())
    }

    /// Serializes the error as its JSON wire body.
    #[must_use]
    pub fn to_json(&self) -> Bytes {
        match serde_json::to_vec(self) {
            Ok(body) => Bytes::from(body),
            Err(_) => Bytes::from_static(
                br#"{"HTTPCode":500,"Message":"Internal Server Error"}"#,
            ),
        }
    }
}

impl Default for RpcError {
    fn default() -> Self {
        Self::internal()
    }
}
