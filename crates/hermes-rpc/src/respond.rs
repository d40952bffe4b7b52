//! Writing handler results to the wire.

use bytes::Bytes;
use http::StatusCode;
use serde::Serialize;

use hermes_core::RpcError;
use hermes_middleware::{Response, ResponseExt};

/// Translates a failure into its response.
///
/// An error that is, or wraps, an [`RpcError`] with a valid status is
/// returned as-is, without logging. Anything else is logged at error level
/// and answered with the generic `500` body, so internal details never reach
/// the client.
pub fn handle_error(err: &anyhow::Error) -> Response {
    match RpcError::find(err) {
        Some(rpc) if rpc.has_valid_status() => Response::rpc_error(rpc),
        Some(rpc) => {
            tracing::error!(
                http_code = rpc.http_code,
                message = %rpc.message,
                "error carries an invalid status"
            );
            Response::rpc_error(&RpcError::internal())
        }
        None => {
            tracing::error!(error = ?err, "internal error");
            Response::rpc_error(&RpcError::internal())
        }
    }
}

/// Encodes a successful output as a `200` JSON response.
///
/// The response is only built once encoding has succeeded; an encoding
/// failure goes through [`handle_error`].
pub fn encode_output<Out: Serialize>(output: &Out) -> Response {
    match serde_json::to_vec(output) {
        Ok(body) => Response::json(StatusCode::OK, Bytes::from(body)),
        Err(e) => handle_error(&anyhow::Error::new(e).context("failed to encode response")),
    }
}
