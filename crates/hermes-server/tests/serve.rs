//! End-to-end tests over a real TCP socket.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::{Method, StatusCode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use hermes_middleware::{endpoint_fn, Request, Response, ResponseExt};
use hermes_server::{Router, Server, ServerConfig, ShutdownSignal};

async fn start(router: Router, config: ServerConfig) -> (std::net::SocketAddr, ShutdownSignal) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = ShutdownSignal::new();

    let server = Server::new(config, router);
    let signal = shutdown.clone();
    tokio::spawn(async move { server.serve_listener(listener, signal).await });

    (addr, shutdown)
}

async fn raw_request(addr: std::net::SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

fn echo_router() -> Router {
    let mut router = Router::new();
    let echo = endpoint_fn(|_ctx, request: Request| async move {
        Response::json(StatusCode::OK, request.into_body())
    });
    router.route(Method::POST, "/echo", Arc::new(echo)).unwrap();

    let slow = endpoint_fn(|_ctx, _request| async {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Response::json(StatusCode::OK, Bytes::from_static(b"{}"))
    });
    router.route(Method::GET, "/slow", Arc::new(slow)).unwrap();
    router
}

#[tokio::test]
async fn test_post_body_reaches_endpoint() {
    let (addr, shutdown) = start(echo_router(), ServerConfig::default()).await;

    let body = r#"{"input":"hello"}"#;
    let response = raw_request(
        addr,
        &format!(
            "POST /echo HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        ),
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.contains("content-type: application/json"));
    assert!(response.ends_with(body));
    shutdown.trigger();
}

#[tokio::test]
async fn test_oversized_body_is_413_json() {
    let config = ServerConfig::builder().max_body_size(16).build();
    let (addr, shutdown) = start(echo_router(), config).await;

    let body = r#"{"input":"far more than sixteen bytes"}"#;
    let response = raw_request(
        addr,
        &format!(
            "POST /echo HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
            body.len()
        ),
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 413 Payload Too Large"));
    assert!(response.ends_with(r#"{"HTTPCode":413,"Message":"request body too large"}"#));
    shutdown.trigger();
}

#[tokio::test]
async fn test_unknown_route_is_404_json() {
    let (addr, shutdown) = start(echo_router(), ServerConfig::default()).await;

    let response = raw_request(
        addr,
        "GET /nope HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 404 Not Found"));
    assert!(response.ends_with(r#"{"HTTPCode":404,"Message":"not found"}"#));
    shutdown.trigger();
}

#[tokio::test]
async fn test_request_timeout_is_504() {
    let config = ServerConfig::builder()
        .request_timeout(Duration::from_millis(50))
        .build();
    let (addr, shutdown) = start(echo_router(), config).await;

    let response = raw_request(
        addr,
        "GET /slow HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 504 Gateway Timeout"));
    assert!(response.ends_with(r#"{"HTTPCode":504,"Message":"request timed out"}"#));
    shutdown.trigger();
}
