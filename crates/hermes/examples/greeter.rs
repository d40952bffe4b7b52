//! A small greeting service.
//!
//! ```text
//! cargo run -p hermes --example greeter
//!
//! curl 'localhost:8080/greet?name=Ada'
//! curl -X POST localhost:8080/greet -d '{"name": "Ada", "shout": true}'
//! curl -X DELETE 'localhost:8080/greetings?name=Ada'
//! curl localhost:8080/rpc/docs
//! curl localhost:8080/metrics
//! ```
//!
//! Settings come from an optional `hermes.toml` and `HERMES__*` environment
//! variables, e.g. `HERMES__SERVER__HTTP_ADDR=127.0.0.1:3000`.

use std::collections::HashSet;

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http_body_util::Full;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use hermes::middleware::endpoint_fn;
use hermes::prelude::*;
use hermes::telemetry::{init_logging, init_metrics, render_metrics};

#[derive(Debug, Deserialize, Schema)]
#[schema(crate = "hermes::core")]
struct GreetInput {
    name: String,
    #[serde(default)]
    shout: bool,
}

#[derive(Debug, Serialize, Schema)]
#[schema(crate = "hermes::core")]
struct GreetOutput {
    greeting: String,
    #[serde(rename = "timesGreeted")]
    times_greeted: usize,
}

#[derive(Debug, Deserialize, Schema)]
#[schema(crate = "hermes::core")]
struct ForgetInput {
    name: String,
}

#[derive(Default)]
struct Guestbook {
    seen: Mutex<Vec<String>>,
}

struct Greet(Arc<Guestbook>);

impl RpcHandler<GreetInput, GreetOutput> for Greet {
    async fn handle(&self, ctx: &RpcContext, input: GreetInput) -> anyhow::Result<GreetOutput> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(RpcError::bad_request("name must not be empty").into());
        }

        let times_greeted = {
            let mut seen = self.0.seen.lock();
            seen.push(name.to_string());
            seen.iter().filter(|n| n.as_str() == name).count()
        };
        tracing::info!(request_id = ?ctx.request_id(), name, times_greeted, "greeted");

        let greeting = format!("Hello, {name}!");
        Ok(GreetOutput {
            greeting: if input.shout {
                greeting.to_uppercase()
            } else {
                greeting
            },
            times_greeted,
        })
    }
}

struct Forget(Arc<Guestbook>);

impl RpcHandler<ForgetInput, NoContent> for Forget {
    async fn handle(&self, _ctx: &RpcContext, input: ForgetInput) -> anyhow::Result<NoContent> {
        let mut seen = self.0.seen.lock();
        let before = seen.len();
        seen.retain(|n| *n != input.name);
        if seen.len() == before {
            return Err(RpcError::not_found(format!("never greeted {}", input.name)).into());
        }
        Ok(NoContent {})
    }
}

#[derive(Debug, Serialize, Schema)]
#[schema(crate = "hermes::core")]
struct Visitors {
    names: Vec<String>,
    count: usize,
}

fn metrics_endpoint() -> Arc<dyn hermes::middleware::Endpoint> {
    Arc::new(endpoint_fn(|_ctx, _req| async {
        let body = render_metrics().unwrap_or_default();
        let mut response = Response::new(Full::new(Bytes::from(body)));
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; version=0.0.4"),
        );
        response
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::new()
        .with_development()
        .with_optional_file("hermes.toml")?
        .with_dotenv()?
        .with_env_prefix("HERMES")
        .load()?;

    init_logging(&config.log_config())?;
    init_metrics(&config.metrics_config())?;

    let mut rpc = Rpc::new();
    rpc.register_middleware(Arc::new(RequestIdMiddleware::new()))
        .register_middleware(Arc::new(TelemetryMiddleware::new()));

    let guestbook = Arc::new(Guestbook::default());
    let mut router = Router::new();

    rpc.register(&mut router, Method::GET, "/greet", Greet(Arc::clone(&guestbook)), vec![])?;
    rpc.register(&mut router, Method::POST, "/greet", Greet(Arc::clone(&guestbook)), vec![])?;
    rpc.register(
        &mut router,
        Method::DELETE,
        "/greetings",
        Forget(Arc::clone(&guestbook)),
        vec![],
    )?;

    let visitors = {
        let guestbook = Arc::clone(&guestbook);
        handler_fn("Visitors", move |_ctx, _input: Empty| {
            let guestbook = Arc::clone(&guestbook);
            async move {
                let names: Vec<String> = {
                    let seen = guestbook.seen.lock();
                    let mut unique = HashSet::new();
                    seen.iter().filter(|n| unique.insert(*n)).cloned().collect()
                };
                Ok::<_, anyhow::Error>(Visitors {
                    count: names.len(),
                    names,
                })
            }
        })
    };
    rpc.register(&mut router, Method::GET, "/visitors", visitors, vec![])?;

    if config.docs.enabled {
        rpc.register_docs_at(&mut router, &config.docs.path)?;
    }
    if config.metrics.enabled {
        router.route(Method::GET, "/metrics", metrics_endpoint())?;
    }

    tracing::info!(
        service = %config.service_name,
        addr = %config.server.http_addr,
        operations = rpc.catalog().len(),
        "starting greeter"
    );

    Server::new(config.server_config(), router).serve().await?;
    Ok(())
}
