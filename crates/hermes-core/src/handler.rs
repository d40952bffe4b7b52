//! The typed handler contract.
//!
//! An [`RpcHandler<In, Out>`] turns a decoded `In` into an `Out`. The dispatch
//! layer owns everything around that call: decoding the request, encoding the
//! response, and translating failures into [`RpcError`](crate::RpcError)
//! responses.

use crate::schema::{FieldSchema, Schema};
use crate::RpcContext;
use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use std::marker::PhantomData;

/// A typed request handler.
///
/// Implementations must be safe to call concurrently; any shared state they
/// hold needs its own synchronization.
///
/// To fail with a specific status, return (or wrap) an
/// [`RpcError`](crate::RpcError). Any other error is reported to the client as
/// a generic `500 Internal Server Error` and logged server-side.
///
/// # Example
///
/// ```rust,ignore
/// use hermes_core::{RpcContext, RpcError, RpcHandler};
/// use hermes_macros::Schema;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Deserialize, Schema)]
/// struct GetUserInput {
///     #[serde(rename = "userId")]
///     user_id: u64,
/// }
///
/// #[derive(Serialize, Schema)]
/// struct User {
///     name: String,
/// }
///
/// struct GetUser;
///
/// impl RpcHandler<GetUserInput, User> for GetUser {
///     async fn handle(&self, _ctx: &RpcContext, input: GetUserInput) -> anyhow::Result<User> {
///         if input.user_id == 0 {
///             return Err(RpcError::not_found("no such user").into());
///         }
///         Ok(User { name: "Alice".to_string() })
///     }
/// }
/// ```
pub trait RpcHandler<In, Out>: Send + Sync + 'static
where
    In: DeserializeOwned + Schema + Send + 'static,
    Out: Serialize + Schema + Send + 'static,
{
    /// The handler's declared name.
    ///
    /// Defaults to the implementing type's name without its module path or
    /// generic arguments.
    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }

    /// Shape of the input type as decoded, listed by the documentation endpoint.
    fn input_schema(&self) -> Option<Vec<FieldSchema>> {
        In::input_schema()
    }

    /// Shape of the output type as encoded, listed by the documentation endpoint.
    fn output_schema(&self) -> Option<Vec<FieldSchema>> {
        Out::output_schema()
    }

    /// Handles one decoded request.
    fn handle(
        &self,
        ctx: &RpcContext,
        input: In,
    ) -> impl Future<Output = Result<Out, anyhow::Error>> + Send;
}

/// Returns the name of `T` with module path and generic arguments removed.
///
/// One leading reference is stripped, so `&app::handlers::Echo<u8>` yields
/// `Echo`.
///
/// ```
/// use hermes_core::short_type_name;
///
/// struct Echo;
/// assert_eq!(short_type_name::<Echo>(), "Echo");
/// assert_eq!(short_type_name::<&Echo>(), "Echo");
/// assert_eq!(short_type_name::<Vec<String>>(), "Vec");
/// ```
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let full = full.strip_prefix('&').unwrap_or(full);
    let full = full.strip_prefix("mut ").unwrap_or(full);
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// A handler built from an async closure.
///
/// Closures have no meaningful type name, so the name is given explicitly.
/// See [`handler_fn`].
pub struct FnHandler<F, In, Out> {
    name: &'static str,
    func: F,
    _marker: PhantomData<fn(In) -> Out>,
}

/// Creates a named handler from an async closure.
///
/// # Example
///
/// ```rust,ignore
/// let echo = hermes_core::handler_fn("Echo", |_ctx, input: EchoInput| async move {
///     Ok(EchoOutput { output: input.input })
/// });
/// ```
pub fn handler_fn<F, Fut, In, Out>(name: &'static str, func: F) -> FnHandler<F, In, Out>
where
    F: Fn(RpcContext, In) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Out, anyhow::Error>> + Send + 'static,
{
    FnHandler {
        name,
        func,
        _marker: PhantomData,
    }
}

impl<F, Fut, In, Out> RpcHandler<In, Out> for FnHandler<F, In, Out>
where
    F: Fn(RpcContext, In) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Out, anyhow::Error>> + Send + 'static,
    In: DeserializeOwned + Schema + Send + 'static,
    Out: Serialize + Schema + Send + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn handle(
        &self,
        ctx: &RpcContext,
        input: In,
    ) -> impl Future<Output = Result<Out, anyhow::Error>> + Send {
        (self.func)(ctx.clone(), input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Empty, FieldKind, NoContent};
    use crate::RpcError;

    #[derive(Debug, serde::Deserialize)]
    struct Greeting {
        name: String,
    }

    impl Schema for Greeting {
        fn input_schema() -> Option<Vec<FieldSchema>> {
            Some(vec![FieldSchema::new("name", FieldKind::String)])
        }

        fn output_schema() -> Option<Vec<FieldSchema>> {
            Some(vec![FieldSchema::new("greeting_name", FieldKind::String)])
        }
    }

    #[derive(Debug, PartialEq, serde::Serialize)]
    struct Reply {
        greeting: String,
    }

    impl Schema for Reply {
        fn input_schema() -> Option<Vec<FieldSchema>> {
            None
        }

        fn output_schema() -> Option<Vec<FieldSchema>> {
            Some(vec![FieldSchema::new("greeting", FieldKind::String)])
        }
    }

    struct GreetHandler;

    impl RpcHandler<Greeting, Reply> for GreetHandler {
        async fn handle(&self, _ctx: &RpcContext, input: Greeting) -> anyhow::Result<Reply> {
            Ok(Reply {
                greeting: format!("Hello, {}!", input.name),
            })
        }
    }

    mod nested {
        pub struct Wrapper<T>(pub T);
    }

    #[tokio::test]
    async fn test_handler_impl() {
        let reply = GreetHandler
            .handle(
                &RpcContext::new(),
                Greeting {
                    name: "World".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(reply.greeting, "Hello, World!");
    }

    #[test]
    fn test_default_name_is_type_name() {
        assert_eq!(GreetHandler.name(), "GreetHandler");
    }

    #[test]
    fn test_default_schemas_come_from_types() {
        let input = GreetHandler.input_schema().unwrap();
        assert_eq!(input[0].name, "name");
        let output = GreetHandler.output_schema().unwrap();
        assert_eq!(output[0].name, "greeting");
        assert_eq!(output[0].kind, FieldKind::String);
    }

    #[test]
    fn test_short_type_name_strips_generics_and_path() {
        assert_eq!(short_type_name::<nested::Wrapper<Greeting>>(), "Wrapper");
        assert_eq!(short_type_name::<&nested::Wrapper<u8>>(), "Wrapper");
        assert_eq!(short_type_name::<u64>(), "u64");
    }

    #[tokio::test]
    async fn test_fn_handler() {
        let handler = handler_fn("Fails", |_ctx, _input: Empty| async move {
            Err::<NoContent, anyhow::Error>(RpcError::service_unavailable("down").into())
        });

        assert_eq!(handler.name(), "Fails");
        assert!(handler.input_schema().is_none());

        let err = handler.handle(&RpcContext::new(), Empty {}).await.unwrap_err();
        assert_eq!(RpcError::find(&err).unwrap().http_code, 503);
    }
}
