//! Request building.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderName, HeaderValue, Method};
use serde::Serialize;

use hermes_middleware::{Request, APPLICATION_JSON};

use crate::error::TestError;

/// Builds a request for a [`TestClient`](crate::TestClient).
///
/// Invalid headers or bodies do not panic while building; the first problem
/// is reported by [`build`](Self::build).
#[must_use]
#[derive(Debug)]
pub struct TestRequestBuilder {
    method: Method,
    path: String,
    query: Vec<String>,
    headers: Vec<(HeaderName, HeaderValue)>,
    body: Bytes,
    error: Option<TestError>,
}

impl TestRequestBuilder {
    /// Starts a request. `uri` may already contain a query string.
    pub fn new(method: Method, uri: impl AsRef<str>) -> Self {
        Self {
            method,
            path: uri.as_ref().to_string(),
            query: Vec::new(),
            headers: Vec::new(),
            body: Bytes::new(),
            error: None,
        }
    }

    /// Appends a percent-encoded query parameter.
    pub fn query(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        self.query.push(format!(
            "{}={}",
            urlencoding::encode(name.as_ref()),
            urlencoding::encode(value.as_ref())
        ));
        self
    }

    /// Sets a header, replacing any earlier value.
    pub fn header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let name = HeaderName::try_from(name.as_ref());
        let value = HeaderValue::try_from(value.as_ref());
        match (name, value) {
            (Ok(name), Ok(value)) => {
                self.headers.retain(|(existing, _)| *existing != name);
                self.headers.push((name, value));
            }
            (Err(e), _) => self.fail(format!("invalid header name: {e}")),
            (_, Err(e)) => self.fail(format!("invalid header value: {e}")),
        }
        self
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets a JSON body and `Content-Type: application/json`.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => self.body = Bytes::from(bytes),
            Err(e) => {
                if self.error.is_none() {
                    self.error = Some(TestError::Json(e));
                }
            }
        }
        self.header(CONTENT_TYPE.as_str(), APPLICATION_JSON)
    }

    fn fail(&mut self, message: String) {
        if self.error.is_none() {
            self.error = Some(TestError::RequestBuild(message));
        }
    }

    /// Builds the request.
    pub fn build(self) -> Result<Request, TestError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let uri = if self.query.is_empty() {
            self.path
        } else {
            let separator = if self.path.contains('?') { '&' } else { '?' };
            format!("{}{separator}{}", self.path, self.query.join("&"))
        };

        let mut builder = http::Request::builder().method(self.method).uri(uri);
        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }
        builder
            .body(self.body)
            .map_err(|e| TestError::RequestBuild(e.to_string()))
    }
}
