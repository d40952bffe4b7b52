//! Request and response types used by every chain.

use bytes::Bytes;
use hermes_core::RpcError;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use http_body_util::Full;

/// The HTTP request type seen by middleware and endpoints.
///
/// The body is fully collected before dispatch.
pub type Request = http::Request<Bytes>;

/// The HTTP response type produced by middleware and endpoints.
pub type Response = http::Response<Full<Bytes>>;

/// Content type of every Hermes response body.
pub const APPLICATION_JSON: &str = "application/json";

/// Helpers for building JSON responses.
pub trait ResponseExt {
    /// A response with the given status and a JSON body.
    fn json(status: StatusCode, body: Bytes) -> Response;

    /// The wire form of an [`RpcError`]: its status and JSON body.
    fn rpc_error(error: &RpcError) -> Response;
}

impl ResponseExt for Response {
    fn json(status: StatusCode, body: Bytes) -> Response {
        let mut response = http::Response::new(Full::new(body));
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        response
    }

    fn rpc_error(error: &RpcError) -> Response {
        Self::json(error.status_code(), error.to_json())
    }
}
