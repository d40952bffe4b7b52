//! End-to-end dispatch through the in-memory client.

use std::collections::BTreeMap;
use std::sync::Arc;

use http::header::CONTENT_TYPE;
use http::{HeaderValue, Method, StatusCode};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use hermes_core::{handler_fn, Empty, RpcContext, RpcError, RpcHandler};
use hermes_macros::Schema;
use hermes_middleware::{from_fn, BoxedMiddleware};
use hermes_rpc::Rpc;
use hermes_server::Router;
use hermes_test::TestClient;

#[derive(Debug, Deserialize, Schema)]
struct TestInput {
    input: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Schema)]
struct TestOutput {
    output: String,
}

struct TestHandler;

impl RpcHandler<TestInput, TestOutput> for TestHandler {
    async fn handle(&self, _ctx: &RpcContext, input: TestInput) -> anyhow::Result<TestOutput> {
        assert!(!input.input.is_empty());
        Ok(TestOutput {
            output: "success".to_string(),
        })
    }
}

fn client_with(method: Method) -> TestClient {
    let rpc = Rpc::new();
    let mut router = Router::new();
    rpc.register(&mut router, method, "/test", TestHandler, vec![])
        .unwrap();
    TestClient::new(router)
}

#[tokio::test]
async fn test_get_with_query() {
    let client = client_with(Method::GET);
    let response = client.get("/test?input=hello").send().await;

    response
        .assert_status(StatusCode::OK)
        .assert_header(CONTENT_TYPE.as_str(), "application/json");
    let output: TestOutput = response.json().unwrap();
    assert_eq!(output.output, "success");
}

#[tokio::test]
async fn test_get_missing_query_is_400() {
    let client = client_with(Method::GET);
    let response = client.get("/test").send().await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let error: RpcError = response.json().unwrap();
    assert_eq!(error.http_code, 400);
    assert!(error.message.contains("input"));
}

#[tokio::test]
async fn test_get_ignores_unknown_query_keys() {
    let client = client_with(Method::GET);
    client
        .get("/test")
        .query("input", "hello")
        .query("unused", "1")
        .send()
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_delete_decodes_query() {
    let client = client_with(Method::DELETE);
    client
        .delete("/test")
        .query("input", "gone")
        .send()
        .await
        .assert_status(StatusCode::OK)
        .assert_json(&serde_json::json!({"output": "success"}));

    client
        .delete("/test")
        .json(&serde_json::json!({"input": "in body"}))
        .send()
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_post_with_json_body() {
    let client = client_with(Method::POST);
    client
        .post("/test")
        .json(&serde_json::json!({"input": "hello"}))
        .send()
        .await
        .assert_status(StatusCode::OK)
        .assert_json(&serde_json::json!({"output": "success"}));
}

#[tokio::test]
async fn test_post_empty_body_is_400() {
    let client = client_with(Method::POST);
    client
        .post("/test")
        .send()
        .await
        .assert_rpc_error(StatusCode::BAD_REQUEST, "invalid body");
}

#[tokio::test]
async fn test_post_malformed_body_is_400() {
    let client = client_with(Method::POST);
    client
        .post("/test?input=ignored")
        .body(r#"{"input": "#)
        .send()
        .await
        .assert_rpc_error(StatusCode::BAD_REQUEST, "invalid body");
}

#[tokio::test]
async fn test_put_decodes_body() {
    let client = client_with(Method::PUT);
    client
        .put("/test")
        .json(&serde_json::json!({"input": "hello"}))
        .send()
        .await
        .assert_status(StatusCode::OK);
}

#[tokio::test]
async fn test_handler_rpc_error_passes_through() {
    let rpc = Rpc::new();
    let mut router = Router::new();
    let handler = handler_fn("Unavailable", |_ctx, _input: Empty| async {
        Err::<TestOutput, anyhow::Error>(RpcError::service_unavailable("try again later").into())
    });
    rpc.register(&mut router, Method::GET, "/down", handler, vec![])
        .unwrap();

    TestClient::new(router)
        .get("/down")
        .send()
        .await
        .assert_rpc_error(StatusCode::SERVICE_UNAVAILABLE, "try again later");
}

#[tokio::test]
async fn test_handler_wrapped_rpc_error_passes_through() {
    let rpc = Rpc::new();
    let mut router = Router::new();
    let handler = handler_fn("Wrapped", |_ctx, _input: Empty| async {
        let err = anyhow::Error::new(RpcError::not_found("no such user")).context("lookup failed");
        Err::<TestOutput, anyhow::Error>(err)
    });
    rpc.register(&mut router, Method::GET, "/wrapped", handler, vec![])
        .unwrap();

    TestClient::new(router)
        .get("/wrapped")
        .send()
        .await
        .assert_rpc_error(StatusCode::NOT_FOUND, "no such user");
}

#[tokio::test]
async fn test_untyped_error_is_generic_500() {
    let rpc = Rpc::new();
    let mut router = Router::new();
    let handler = handler_fn("Leaky", |_ctx, _input: Empty| async {
        Err::<TestOutput, anyhow::Error>(anyhow::anyhow!("connection string postgres://secret"))
    });
    rpc.register(&mut router, Method::GET, "/leaky", handler, vec![])
        .unwrap();

    let response = TestClient::new(router).get("/leaky").send().await;
    response.assert_rpc_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
    assert!(!response.text().unwrap().contains("secret"));
}

#[derive(Serialize, Schema)]
struct Unencodable {
    values: BTreeMap<(u8, u8), String>,
}

#[tokio::test]
async fn test_encode_failure_is_generic_500() {
    let rpc = Rpc::new();
    let mut router = Router::new();
    let handler = handler_fn("Unencodable", |_ctx, _input: Empty| async {
        let mut values = BTreeMap::new();
        values.insert((1, 2), "x".to_string());
        Ok::<_, anyhow::Error>(Unencodable { values })
    });
    rpc.register(&mut router, Method::POST, "/bad-output", handler, vec![])
        .unwrap();

    TestClient::new(router)
        .post("/bad-output")
        .json(&serde_json::json!({}))
        .send()
        .await
        .assert_rpc_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
}

type Log = Arc<Mutex<Vec<&'static str>>>;

fn recording(name: &'static str, log: &Log) -> BoxedMiddleware {
    let log = Arc::clone(log);
    Arc::new(from_fn(name, move |ctx, req, next| {
        let log = Arc::clone(&log);
        Box::pin(async move {
            log.lock().push(name);
            let mut response = next.run(ctx, req).await;
            response
                .headers_mut()
                .insert("x-outermost", HeaderValue::from_static(name));
            response
        })
    }))
}

#[tokio::test]
async fn test_middleware_order() {
    let log: Log = Arc::default();
    let mut rpc = Rpc::new();
    rpc.register_middleware(recording("A", &log))
        .register_middleware(recording("B", &log));
    assert_eq!(rpc.default_middleware(), vec!["A", "B"]);

    let mut router = Router::new();
    rpc.register(
        &mut router,
        Method::GET,
        "/test",
        TestHandler,
        vec![recording("C", &log)],
    )
    .unwrap();

    let response = TestClient::new(router)
        .get("/test")
        .query("input", "hello")
        .send()
        .await;

    response.assert_status(StatusCode::OK);
    assert_eq!(*log.lock(), vec!["A", "B", "C"]);
    // The outermost stage writes the header last.
    response.assert_header("x-outermost", "A");
}

struct Marker(&'static str);

fn marking(name: &'static str) -> BoxedMiddleware {
    Arc::new(from_fn(name, move |ctx, mut req, next| {
        req.headers_mut()
            .insert("x-marker", HeaderValue::from_static(name));
        Box::pin(next.run(ctx.with_value(Marker(name)), req))
    }))
}

#[derive(Debug, Serialize, Deserialize, Schema)]
struct MarkerOutput {
    marker: String,
}

#[tokio::test]
async fn test_operation_middleware_marks_last() {
    let mut rpc = Rpc::new();
    rpc.register_middleware(marking("A"))
        .register_middleware(marking("B"));

    let echo = handler_fn("EchoMarker", |ctx: RpcContext, _input: Empty| async move {
        let marker = ctx.value::<Marker>().map_or("none", |m| m.0);
        Ok::<_, anyhow::Error>(MarkerOutput {
            marker: marker.to_string(),
        })
    });
    let mut router = Router::new();
    rpc.register(&mut router, Method::GET, "/marker", echo, vec![marking("C")])
        .unwrap();

    let response = TestClient::new(router).get("/marker").send().await;
    response.assert_status(StatusCode::OK);
    let output: MarkerOutput = response.json().unwrap();
    assert_eq!(output.marker, "C");
}

#[derive(Debug, Deserialize, Schema)]
struct TagsInput {
    tag: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Schema)]
struct TagsOutput {
    tags: Vec<String>,
}

fn tags_client() -> TestClient {
    let rpc = Rpc::new();
    let mut router = Router::new();
    let tags = handler_fn("Tags", |_ctx, input: TagsInput| async move {
        Ok::<_, anyhow::Error>(TagsOutput { tags: input.tag })
    });
    rpc.register(&mut router, Method::GET, "/tags", tags, vec![])
        .unwrap();
    TestClient::new(router)
}

#[tokio::test]
async fn test_repeated_query_keys_fill_list() {
    let client = tags_client();

    let response = client.get("/tags?tag=a&tag=b").send().await;
    response.assert_status(StatusCode::OK);
    let output: TagsOutput = response.json().unwrap();
    assert_eq!(output.tags, vec!["a", "b"]);

    let response = client.get("/tags?tag=a").send().await;
    response.assert_status(StatusCode::OK);
    let output: TagsOutput = response.json().unwrap();
    assert_eq!(output.tags, vec!["a"]);
}

#[tokio::test]
async fn test_defaults_apply_only_to_later_registrations() {
    let log: Log = Arc::default();
    let mut rpc = Rpc::new();
    let mut router = Router::new();

    rpc.register(&mut router, Method::GET, "/before", TestHandler, vec![])
        .unwrap();
    rpc.register_middleware(recording("late", &log));
    rpc.register(&mut router, Method::GET, "/after", TestHandler, vec![])
        .unwrap();

    let client = TestClient::new(router);
    client.get("/before?input=x").send().await.assert_status(StatusCode::OK);
    assert!(log.lock().is_empty());

    client.get("/after?input=x").send().await.assert_status(StatusCode::OK);
    assert_eq!(*log.lock(), vec!["late"]);
}

#[tokio::test]
async fn test_short_circuit_skips_handler() {
    let calls = Arc::new(Mutex::new(0));
    let counted = {
        let calls = Arc::clone(&calls);
        handler_fn("Counted", move |_ctx, _input: Empty| {
            let calls = Arc::clone(&calls);
            async move {
                *calls.lock() += 1;
                Ok::<_, anyhow::Error>(Empty {})
            }
        })
    };
    let deny: BoxedMiddleware = Arc::new(from_fn("deny", |_ctx, _req, _next| {
        Box::pin(async {
            hermes_rpc::handle_error(&RpcError::new(StatusCode::FORBIDDEN, "denied").into())
        })
    }));

    let rpc = Rpc::new();
    let mut router = Router::new();
    rpc.register(&mut router, Method::GET, "/guarded", counted, vec![deny])
        .unwrap();

    TestClient::new(router)
        .get("/guarded")
        .send()
        .await
        .assert_rpc_error(StatusCode::FORBIDDEN, "denied");
    assert_eq!(*calls.lock(), 0);
}

#[tokio::test]
async fn test_handler_name_visible_to_middleware_and_handler() {
    let seen: Arc<Mutex<Vec<String>>> = Arc::default();
    let observer: BoxedMiddleware = {
        let seen = Arc::clone(&seen);
        Arc::new(from_fn("observer", move |ctx, req, next| {
            let seen = Arc::clone(&seen);
            Box::pin(async move {
                seen.lock()
                    .push(format!("mw:{}", ctx.handler_name().unwrap_or("?")));
                next.run(ctx, req).await
            })
        }))
    };

    struct NamedHandler(Arc<Mutex<Vec<String>>>);

    impl RpcHandler<Empty, Empty> for NamedHandler {
        async fn handle(&self, ctx: &RpcContext, _input: Empty) -> anyhow::Result<Empty> {
            self.0
                .lock()
                .push(format!("handler:{}", ctx.handler_name().unwrap_or("?")));
            Ok(Empty {})
        }
    }

    let mut rpc = Rpc::new();
    rpc.register_middleware(observer);
    let mut router = Router::new();
    rpc.register(
        &mut router,
        Method::GET,
        "/named",
        NamedHandler(Arc::clone(&seen)),
        vec![],
    )
    .unwrap();
    rpc.register_docs(&mut router).unwrap();

    let client = TestClient::new(router);
    client.get("/named").send().await.assert_status(StatusCode::OK);
    client.get("/rpc/docs").send().await.assert_status(StatusCode::OK);

    assert_eq!(
        *seen.lock(),
        vec!["mw:NamedHandler", "handler:NamedHandler", "mw:RpcDocs"]
    );
}

#[tokio::test]
async fn test_duplicate_registration_first_wins() {
    let rpc = Rpc::new();
    let mut router = Router::new();
    rpc.register(&mut router, Method::GET, "/test", TestHandler, vec![])
        .unwrap();

    let second = handler_fn("Second", |_ctx, _input: Empty| async {
        Ok::<_, anyhow::Error>(TestOutput {
            output: "second".to_string(),
        })
    });
    assert!(rpc
        .register(&mut router, Method::GET, "/test", second, vec![])
        .is_err());
    assert_eq!(rpc.catalog().len(), 1);

    TestClient::new(router)
        .get("/test?input=x")
        .send()
        .await
        .assert_json(&serde_json::json!({"output": "success"}));
}
