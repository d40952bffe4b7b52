//! Radix tree router for Hermes.
//!
//! Maps an HTTP method and a request path to a value of any type `T`. Hermes
//! stores request endpoints in it, but the router itself knows nothing about
//! HTTP handling.
//!
//! # Features
//!
//! - **Radix Tree Matching**: lookup cost grows with path length, not route count
//! - **Path Parameters**: named segments (`/users/{id}`)
//! - **Wildcards**: catch-all tails (`/files/*path`)
//! - **First Registration Wins**: a duplicate method + path is rejected
//!
//! # Example
//!
//! ```rust
//! use hermes_router::Router;
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.insert(Method::GET, "/users", "listUsers").unwrap();
//! router.insert(Method::GET, "/users/{id}", "getUser").unwrap();
//!
//! let m = router.match_route(&Method::GET, "/users/123").unwrap();
//! assert_eq!(*m.value, "getUser");
//! assert_eq!(m.pattern, "/users/{id}");
//! assert_eq!(m.params.get("id"), Some("123"));
//!
//! assert!(router.insert(Method::GET, "/users", "again").is_err());
//! ```

mod method_router;
mod node;
mod params;
mod router;

pub use method_router::MethodRouter;
pub use node::Node;
pub use params::Params;
pub use router::{InsertError, Lookup, Router};

/// A matched route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    /// The value registered for the method and path.
    pub value: &'a T,
    /// The pattern the route was registered under.
    pub pattern: &'a str,
    /// Extracted path parameters.
    pub params: Params,
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_basic_routing() {
        let mut router = Router::new();
        router.insert(Method::GET, "/users", 1).unwrap();
        router.insert(Method::GET, "/users/{id}", 2).unwrap();

        let m = router.match_route(&Method::GET, "/users").unwrap();
        assert_eq!(*m.value, 1);
        assert!(m.params.is_empty());

        let m = router.match_route(&Method::GET, "/users/123").unwrap();
        assert_eq!(*m.value, 2);
        assert_eq!(m.params.get("id"), Some("123"));
    }

    #[test]
    fn test_wildcard_routing() {
        let mut router = Router::new();
        router.insert(Method::GET, "/files/*path", "serve").unwrap();

        let m = router
            .match_route(&Method::GET, "/files/images/logo.png")
            .unwrap();
        assert_eq!(m.params.get("path"), Some("images/logo.png"));
    }

    #[test]
    fn test_multiple_params() {
        let mut router = Router::new();
        router
            .insert(Method::GET, "/orgs/{orgId}/users/{userId}", "getOrgUser")
            .unwrap();

        let m = router
            .match_route(&Method::GET, "/orgs/acme/users/123")
            .unwrap();
        assert_eq!(m.params.get("orgId"), Some("acme"));
        assert_eq!(m.params.get("userId"), Some("123"));
    }
}
