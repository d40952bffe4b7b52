//! Request input decoding.
//!
//! `GET` and `DELETE` carry their input in the URL query string; every other
//! method carries it as a JSON body.

use std::fmt;

use http::Method;
use serde::de::DeserializeOwned;

use hermes_core::RpcError;
use hermes_middleware::Request;

/// Client-facing message for an undecodable body.
pub const INVALID_BODY_MESSAGE: &str = "invalid body";

/// Where an operation reads its input from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    /// URL query parameters, decoded with `serde_html_form`.
    Query,
    /// Request body, decoded with `serde_json`.
    Body,
}

impl InputSource {
    /// The input source used for `method`.
    #[must_use]
    pub fn for_method(method: &Method) -> Self {
        if method == Method::GET || method == Method::DELETE {
            Self::Query
        } else {
            Self::Body
        }
    }

    /// How the documentation endpoint describes this source.
    #[must_use]
    pub const fn doc_label(self) -> &'static str {
        match self {
            Self::Query => "query parameters",
            Self::Body => "json body",
        }
    }

    /// Label used in decode failure metrics.
    #[must_use]
    pub const fn metric_label(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Body => "body",
        }
    }
}

/// An input that could not be decoded. Always a client error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    /// Where decoding was attempted.
    pub source: InputSource,
    /// The message returned to the client.
    pub message: String,
}

impl DecodeError {
    /// The `400` error sent to the client.
    #[must_use]
    pub fn to_rpc_error(&self) -> RpcError {
        RpcError::bad_request(self.message.clone())
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source.metric_label(), self.message)
    }
}

impl std::error::Error for DecodeError {}

/// Decodes `In` from the request according to its method.
///
/// Query failures carry the decoder's own description, such as
/// ``missing field `input` ``, and are not logged. Body failures carry
/// [`INVALID_BODY_MESSAGE`] and the underlying error is logged.
pub fn decode_input<In: DeserializeOwned>(request: &Request) -> Result<In, DecodeError> {
    match InputSource::for_method(request.method()) {
        InputSource::Query => decode_query(request.uri().query().unwrap_or_default()),
        InputSource::Body => decode_body(request.body()),
    }
}

/// Decodes a URL query string. Unknown keys are ignored.
///
/// A key repeated in the query fills a sequence field, such as
/// `?tag=a&tag=b` into `tag: Vec<String>`.
pub fn decode_query<In: DeserializeOwned>(query: &str) -> Result<In, DecodeError> {
    serde_html_form::from_str(query).map_err(|e| DecodeError {
        source: InputSource::Query,
        message: e.to_string(),
    })
}

/// Decodes a JSON body.
pub fn decode_body<In: DeserializeOwned>(body: &[u8]) -> Result<In, DecodeError> {
    serde_json::from_slice(body).map_err(|e| {
        tracing::error!(error = %e, "failed to decode request body");
        DecodeError {
            source: InputSource::Body,
            message: INVALID_BODY_MESSAGE.to_string(),
        }
    })
}
