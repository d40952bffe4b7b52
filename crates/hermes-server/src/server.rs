//! The HTTP server.
//!
//! A hyper HTTP/1.1 accept loop on Tokio. Each request body is collected in
//! full, up to the configured size cap, then handed to the [`Router`]. The
//! whole exchange is bounded by the configured request timeout.
//!
//! ```rust,ignore
//! use hermes_server::{Router, Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), hermes_server::ServerError> {
//!     let router = Router::new();
//!     let config = ServerConfig::builder().http_addr("0.0.0.0:8080").build();
//!
//!     Server::new(config, router).serve().await
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};

use hermes_core::RpcError;
use hermes_middleware::{Request, Response, ResponseExt};

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::router::Router;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// Message of the `504` body sent when a request exceeds its timeout.
pub const TIMEOUT_MESSAGE: &str = "request timed out";

/// Message of the `400` body sent when the request body cannot be read.
pub const BODY_READ_MESSAGE: &str = "failed to read request body";

/// Message of the `413` body sent when the request body exceeds the cap.
pub const BODY_TOO_LARGE_MESSAGE: &str = "request body too large";

/// The Hermes HTTP server.
pub struct Server {
    config: ServerConfig,
    router: Arc<Router>,
}

impl Server {
    /// Creates a server over a fully registered router.
    #[must_use]
    pub fn new(config: ServerConfig, router: Router) -> Self {
        Self {
            config,
            router: Arc::new(router),
        }
    }

    /// The server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The router requests are dispatched to.
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Serves until SIGTERM or SIGINT.
    pub async fn serve(self) -> Result<(), ServerError> {
        self.serve_with_shutdown(ShutdownSignal::with_os_signals())
            .await
    }

    /// Binds the configured address and serves until `shutdown` triggers.
    pub async fn serve_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self
            .config
            .socket_addr()
            .map_err(|source| ServerError::InvalidAddress {
                addr: self.config.http_addr().to_string(),
                source,
            })?;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        self.serve_listener(listener, shutdown).await
    }

    /// Serves connections from an already bound listener until `shutdown`
    /// triggers, then waits up to the shutdown timeout for open connections.
    pub async fn serve_listener(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, routes = self.router.len(), "server listening");

        let shared = Arc::new(Shared {
            router: Arc::clone(&self.router),
            request_timeout: self.config.request_timeout(),
            keep_alive: self.config.keep_alive(),
            max_body_size: self.config.max_body_size(),
        });
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, remote_addr)) => {
                        let shared = Arc::clone(&shared);
                        let token = tracker.acquire();
                        let shutdown = shutdown.clone();
                        tokio::spawn(async move {
                            if let Err(e) = shared.serve_connection(stream, remote_addr, shutdown).await {
                                tracing::debug!(%remote_addr, error = %e, "connection error");
                            }
                            drop(token);
                        });
                    }
                    Err(e) => tracing::error!(error = %e, "failed to accept connection"),
                },
                () = shutdown.recv() => {
                    tracing::info!("shutdown signal received, no longer accepting connections");
                    break;
                }
            }
        }

        drain(&tracker, self.config.shutdown_timeout()).await;
        tracing::info!("server stopped");
        Ok(())
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("router", &self.router)
            .finish()
    }
}

async fn drain(tracker: &ConnectionTracker, timeout: Duration) {
    let open = tracker.active_connections();
    if open > 0 {
        tracing::info!(open, ?timeout, "waiting for connections to close");
    }
    if tokio::time::timeout(timeout, tracker.wait_for_drain())
        .await
        .is_err()
    {
        tracing::warn!(
            open = tracker.active_connections(),
            "shutdown timeout reached with connections still open"
        );
    }
}

/// State shared by every connection task.
struct Shared {
    router: Arc<Router>,
    request_timeout: Duration,
    keep_alive: bool,
    max_body_size: usize,
}

impl Shared {
    async fn serve_connection(
        self: Arc<Self>,
        stream: TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let io = TokioIo::new(stream);
        let shared = Arc::clone(&self);
        let service = service_fn(move |request: http::Request<Incoming>| {
            let shared = Arc::clone(&shared);
            async move { Ok::<_, Infallible>(shared.handle(request).await) }
        });

        let connection = http1::Builder::new()
            .keep_alive(self.keep_alive)
            .serve_connection(io, service);
        tokio::pin!(connection);

        tokio::select! {
            result = connection.as_mut() => result,
            () = shutdown.recv() => {
                tracing::debug!(%remote_addr, "closing connection for shutdown");
                connection.as_mut().graceful_shutdown();
                connection.await
            }
        }
    }

    async fn handle(&self, request: http::Request<Incoming>) -> Response {
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        let exchange = async {
            let (parts, body) = request.into_parts();
            match Limited::new(body, self.max_body_size).collect().await {
                Ok(collected) => {
                    let request = Request::from_parts(parts, collected.to_bytes());
                    self.router.dispatch(request).await
                }
                Err(e) if e.is::<LengthLimitError>() => {
                    tracing::warn!(%method, path, limit = self.max_body_size, "request body too large");
                    Response::rpc_error(&RpcError::payload_too_large(BODY_TOO_LARGE_MESSAGE))
                }
                Err(e) => {
                    tracing::warn!(%method, path, error = %e, "failed to read request body");
                    Response::rpc_error(&RpcError::bad_request(BODY_READ_MESSAGE))
                }
            }
        };

        match tokio::time::timeout(self.request_timeout, exchange).await {
            Ok(response) => response,
            Err(_) => {
                tracing::warn!(%method, path, timeout = ?self.request_timeout, "request timed out");
                Response::rpc_error(&RpcError::gateway_timeout(TIMEOUT_MESSAGE))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_new() {
        let config = ServerConfig::builder().http_addr("127.0.0.1:8080").build();
        let server = Server::new(config, Router::new());

        assert_eq!(server.config().http_addr(), "127.0.0.1:8080");
        assert!(server.router().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_address() {
        let config = ServerConfig::builder().http_addr("not-a-valid-address").build();
        let result = Server::new(config, Router::new())
            .serve_with_shutdown(ShutdownSignal::new())
            .await;

        assert!(matches!(result, Err(ServerError::InvalidAddress { .. })));
    }

    #[tokio::test]
    async fn test_stops_on_shutdown() {
        let config = ServerConfig::builder()
            .http_addr("127.0.0.1:0")
            .shutdown_timeout(Duration::from_millis(100))
            .build();
        let shutdown = ShutdownSignal::new();
        shutdown.trigger();

        let result = tokio::time::timeout(
            Duration::from_secs(5),
            Server::new(config, Router::new()).serve_with_shutdown(shutdown),
        )
        .await;

        assert!(matches!(result, Ok(Ok(()))));
    }
}
