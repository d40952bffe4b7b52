//! Handler name propagation.

use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};
use hermes_core::RpcContext;

/// Stores the handler's name in the context before anything else runs.
///
/// Every downstream stage, including the endpoint, can read it with
/// [`RpcContext::handler_name`].
#[derive(Debug, Clone, Copy)]
pub struct HandlerNameMiddleware {
    handler_name: &'static str,
}

impl HandlerNameMiddleware {
    /// Creates the stage for the named handler.
    #[must_use]
    pub const fn new(handler_name: &'static str) -> Self {
        Self { handler_name }
    }

    /// The name this stage records.
    #[must_use]
    pub const fn handler_name(&self) -> &'static str {
        self.handler_name
    }
}

impl Middleware for HandlerNameMiddleware {
    fn name(&self) -> &'static str {
        "handler_name"
    }

    fn process<'a>(
        &'a self,
        ctx: RpcContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        let ctx = ctx.with_handler_name(self.handler_name);
        Box::pin(next.run(ctx, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::endpoint_fn;
    use crate::types::ResponseExt;
    use bytes::Bytes;
    use http::StatusCode;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_handler_name_visible_downstream() {
        let endpoint = endpoint_fn(|ctx: RpcContext, _req| async move {
            let name = ctx.handler_name().unwrap_or_default().to_string();
            Response::json(StatusCode::OK, Bytes::from(name))
        });
        let middleware = HandlerNameMiddleware::new("GetUser");
        assert_eq!(middleware.handler_name(), "GetUser");

        let request = http::Request::builder()
            .uri("/users")
            .body(Bytes::new())
            .unwrap();
        let response = middleware
            .process(RpcContext::new(), request, Next::endpoint(&endpoint))
            .await;

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, "GetUser");
    }

    #[test]
    fn test_middleware_name() {
        assert_eq!(HandlerNameMiddleware::new("X").name(), "handler_name");
    }
}
