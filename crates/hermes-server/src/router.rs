//! The dispatching router.
//!
//! Wraps a [`hermes_router::Router`] of endpoints and turns lookups into
//! responses: a matched route runs its endpoint, an unknown path gets a
//! `404` and a known path with the wrong method gets a `405` carrying an
//! `Allow` header. Both failures use the standard error body.
//!
//! ```rust
//! use std::sync::Arc;
//! use bytes::Bytes;
//! use http::{Method, StatusCode};
//! use hermes_middleware::{endpoint_fn, Response, ResponseExt};
//! use hermes_server::Router;
//!
//! let mut router = Router::new();
//! let health = endpoint_fn(|_ctx, _req| async {
//!     Response::json(StatusCode::OK, Bytes::from_static(b"{}"))
//! });
//! router.route(Method::GET, "/health", Arc::new(health)).unwrap();
//! assert!(router.contains(&Method::GET, "/health"));
//! ```

use std::fmt;

use http::header::ALLOW;
use http::{HeaderValue, Method};

use hermes_core::{RpcContext, RpcError};
use hermes_middleware::{BoxedEndpoint, Request, Response, ResponseExt};
use hermes_router::{InsertError, Lookup, Params};

/// Message of the `404` error body.
pub const NOT_FOUND_MESSAGE: &str = "not found";

/// Message of the `405` error body.
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "method not allowed";

/// Routes requests by method and path to endpoints.
///
/// Path parameters of the matched route are placed in the request context
/// as a [`Params`] value.
#[derive(Default)]
pub struct Router {
    routes: hermes_router::Router<BoxedEndpoint>,
}

impl Router {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an endpoint for a method and path pattern.
    ///
    /// The first registration of a method + path wins; a duplicate returns
    /// [`InsertError::Conflict`] and leaves the existing route in place.
    pub fn route(
        &mut self,
        method: Method,
        path: &str,
        endpoint: BoxedEndpoint,
    ) -> Result<(), InsertError> {
        self.routes.insert(method.clone(), path, endpoint)?;
        tracing::debug!(%method, path, "route registered");
        Ok(())
    }

    /// Returns `true` if an endpoint is registered for the method and path.
    #[must_use]
    pub fn contains(&self, method: &Method, path: &str) -> bool {
        self.routes.match_route(method, path).is_some()
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Resolves the request and produces its response.
    pub async fn dispatch(&self, request: Request) -> Response {
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        match self.routes.lookup(&method, &path) {
            Lookup::Found(found) => {
                let ctx = context_for(found.params);
                found.value.call(ctx, request).await
            }
            Lookup::MethodNotAllowed(allowed) => {
                tracing::debug!(%method, path, "method not allowed");
                method_not_allowed(&allowed)
            }
            Lookup::NotFound => {
                tracing::debug!(%method, path, "no route");
                Response::rpc_error(&RpcError::not_found(NOT_FOUND_MESSAGE))
            }
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes.len())
            .finish()
    }
}

fn context_for(params: Params) -> RpcContext {
    let ctx = RpcContext::new();
    if params.is_empty() {
        ctx
    } else {
        ctx.with_value(params)
    }
}

fn method_not_allowed(allowed: &[Method]) -> Response {
    let mut response = Response::rpc_error(&RpcError::method_not_allowed(
        METHOD_NOT_ALLOWED_MESSAGE,
    ));
    let allow = allowed
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if let Ok(value) = HeaderValue::from_str(&allow) {
        response.headers_mut().insert(ALLOW, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use hermes_middleware::endpoint_fn;
    use http::StatusCode;
    use http_body_util::BodyExt;
    use std::sync::Arc;

    fn text_endpoint(text: &'static str) -> BoxedEndpoint {
        Arc::new(endpoint_fn(move |_ctx, _req| async move {
            Response::json(StatusCode::OK, Bytes::from_static(text.as_bytes()))
        }))
    }

    fn request(method: Method, uri: &str) -> Request {
        http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Bytes::new())
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_found() {
        let mut router = Router::new();
        router
            .route(Method::GET, "/test", text_endpoint("\"hit\""))
            .unwrap();

        let response = router.dispatch(request(Method::GET, "/test?input=x")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!("hit"));
    }

    #[tokio::test]
    async fn test_dispatch_not_found() {
        let router = Router::new();
        let response = router.dispatch(request(Method::GET, "/missing")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"HTTPCode": 404, "Message": "not found"})
        );
    }

    #[tokio::test]
    async fn test_dispatch_method_not_allowed() {
        let mut router = Router::new();
        router.route(Method::GET, "/test", text_endpoint("1")).unwrap();
        router.route(Method::POST, "/test", text_endpoint("2")).unwrap();

        let response = router.dispatch(request(Method::PUT, "/test")).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(ALLOW).unwrap(), "GET, POST");
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"HTTPCode": 405, "Message": "method not allowed"})
        );
    }

    #[tokio::test]
    async fn test_duplicate_route_first_wins() {
        let mut router = Router::new();
        router.route(Method::GET, "/dup", text_endpoint("1")).unwrap();
        let err = router
            .route(Method::GET, "/dup", text_endpoint("2"))
            .unwrap_err();
        assert!(matches!(err, InsertError::Conflict { .. }));
        assert_eq!(router.len(), 1);

        let response = router.dispatch(request(Method::GET, "/dup")).await;
        assert_eq!(body_json(response).await, serde_json::json!(1));
    }

    #[tokio::test]
    async fn test_path_params_in_context() {
        let mut router = Router::new();
        let endpoint = endpoint_fn(|ctx: RpcContext, _req| async move {
            let id = ctx
                .value::<Params>()
                .and_then(|p| p.get("id"))
                .unwrap_or_default()
                .to_string();
            Response::json(StatusCode::OK, Bytes::from(format!("\"{id}\"")))
        });
        router
            .route(Method::GET, "/users/{id}", Arc::new(endpoint))
            .unwrap();

        let response = router.dispatch(request(Method::GET, "/users/42")).await;
        assert_eq!(body_json(response).await, serde_json::json!("42"));
    }
}
