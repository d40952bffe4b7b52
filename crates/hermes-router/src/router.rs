//! High-level router API.

use std::fmt;

use http::Method;

use crate::node::{Inserted, Node};
use crate::RouteMatch;

/// A radix tree router from `(method, path)` to values of type `T`.
///
/// # Route Priority
///
/// When several patterns could match a path:
///
/// 1. **Static segments** (e.g., `/users/me`)
/// 2. **Parameter segments** (e.g., `/users/{id}`)
/// 3. **Wildcard segments** (e.g., `/files/*path`)
///
/// Empty segments are ignored, so `/users/` and `/users` are the same path.
#[derive(Debug, Clone)]
pub struct Router<T> {
    root: Node<T>,
    route_count: usize,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of resolving a request against the router.
#[derive(Debug)]
pub enum Lookup<'a, T> {
    /// A value is registered for the method and path.
    Found(RouteMatch<'a, T>),
    /// The path exists but not for this method. Carries the allowed methods.
    MethodNotAllowed(Vec<Method>),
    /// No route matches the path.
    NotFound,
}

/// Errors from [`Router::insert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertError {
    /// The method is already registered for this path.
    Conflict {
        /// The conflicting method.
        method: Method,
        /// The pattern being inserted.
        path: String,
    },
    /// A `*wildcard` segment was not the final segment.
    WildcardNotLast {
        /// The pattern being inserted.
        path: String,
    },
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conflict { method, path } => {
                write!(f, "route {method} {path} is already registered")
            }
            Self::WildcardNotLast { path } => {
                write!(f, "wildcard must be the last segment in {path}")
            }
        }
    }
}

impl std::error::Error for InsertError {}

impl<T> Router<T> {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            route_count: 0,
        }
    }

    /// Registers `value` for `method` at `path`.
    ///
    /// The first registration of a method + path wins; later ones are
    /// rejected with [`InsertError::Conflict`].
    pub fn insert(&mut self, method: Method, path: &str, value: T) -> Result<(), InsertError> {
        match self.root.insert(path, method.clone(), value) {
            Inserted::Added => {
                self.route_count += 1;
                Ok(())
            }
            Inserted::Duplicate => Err(InsertError::Conflict {
                method,
                path: path.to_string(),
            }),
            Inserted::WildcardNotLast => Err(InsertError::WildcardNotLast {
                path: path.to_string(),
            }),
        }
    }

    /// Matches a method and path.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, T>> {
        match self.lookup(method, path) {
            Lookup::Found(found) => Some(found),
            Lookup::MethodNotAllowed(_) | Lookup::NotFound => None,
        }
    }

    /// Resolves a method and path, distinguishing an unknown path from a
    /// known path requested with the wrong method.
    #[must_use]
    pub fn lookup(&self, method: &Method, path: &str) -> Lookup<'_, T> {
        let Some((node, params)) = self.root.match_path(path) else {
            return Lookup::NotFound;
        };
        let Some(methods) = node.methods.as_ref() else {
            return Lookup::NotFound;
        };
        match methods.get(method) {
            Some(value) => Lookup::Found(RouteMatch {
                value,
                pattern: node.pattern.as_deref().unwrap_or_default(),
                params,
            }),
            None => Lookup::MethodNotAllowed(methods.allowed_methods()),
        }
    }

    /// Returns the number of registered method + path pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_router_new() {
        let router: Router<()> = Router::new();
        assert!(router.is_empty());
    }

    #[test]
    fn test_lookup_distinguishes_405_from_404() {
        let mut router = Router::new();
        router.insert(Method::GET, "/users", "list").unwrap();
        router.insert(Method::DELETE, "/users", "purge").unwrap();

        match router.lookup(&Method::POST, "/users") {
            Lookup::MethodNotAllowed(allowed) => {
                assert_eq!(allowed, vec![Method::GET, Method::DELETE]);
            }
            other => panic!("expected 405, got {other:?}"),
        }
        assert!(matches!(
            router.lookup(&Method::GET, "/posts"),
            Lookup::NotFound
        ));
    }

    #[test]
    fn test_intermediate_node_is_not_a_route() {
        let mut router = Router::new();
        router.insert(Method::GET, "/api/v1/users", 1).unwrap();
        assert!(matches!(
            router.lookup(&Method::GET, "/api/v1"),
            Lookup::NotFound
        ));
    }

    #[test]
    fn test_conflict_keeps_first() {
        let mut router = Router::new();
        router.insert(Method::GET, "/x", "first").unwrap();
        let err = router.insert(Method::GET, "/x", "second").unwrap_err();
        assert_eq!(err.to_string(), "route GET /x is already registered");
        assert_eq!(router.len(), 1);
        assert_eq!(
            *router.match_route(&Method::GET, "/x").unwrap().value,
            "first"
        );
    }

    #[test]
    fn test_trailing_slash() {
        let mut router = Router::new();
        router.insert(Method::GET, "/users", ()).unwrap();
        assert!(router.match_route(&Method::GET, "/users/").is_some());
    }

    #[test]
    fn test_wildcard_error() {
        let mut router = Router::new();
        let err = router
            .insert(Method::GET, "/files/*path/meta", ())
            .unwrap_err();
        assert!(matches!(err, InsertError::WildcardNotLast { .. }));
        assert!(router.is_empty());
    }
}
