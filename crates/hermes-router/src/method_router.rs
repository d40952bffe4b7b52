//! Per-path method table.
//!
//! [`MethodRouter`] holds the values registered for one path, one per HTTP
//! method. Any method is accepted, including extension methods.

use http::Method;
use smallvec::SmallVec;

/// Maps HTTP methods to values for a single path.
///
/// # Example
///
/// ```rust
/// use hermes_router::MethodRouter;
/// use http::Method;
///
/// let mut methods = MethodRouter::new();
/// assert!(methods.insert(Method::GET, "list"));
/// assert!(methods.insert(Method::POST, "create"));
/// assert!(!methods.insert(Method::GET, "replaced?"));
///
/// assert_eq!(methods.get(&Method::GET), Some(&"list"));
/// assert_eq!(methods.get(&Method::DELETE), None);
/// ```
#[derive(Debug, Clone)]
pub struct MethodRouter<T> {
    entries: SmallVec<[(Method, T); 2]>,
}

impl<T> Default for MethodRouter<T> {
    fn default() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }
}

impl<T> MethodRouter<T> {
    /// Creates an empty method table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `value` for `method`.
    ///
    /// Returns `false`, leaving the existing value in place, when the method
    /// is already registered.
    pub fn insert(&mut self, method: Method, value: T) -> bool {
        if self.contains(&method) {
            return false;
        }
        self.entries.push((method, value));
        true
    }

    /// Returns the value registered for `method`.
    #[must_use]
    pub fn get(&self, method: &Method) -> Option<&T> {
        self.entries
            .iter()
            .find(|(registered, _)| registered == method)
            .map(|(_, value)| value)
    }

    /// Returns true if `method` is registered.
    #[must_use]
    pub fn contains(&self, method: &Method) -> bool {
        self.get(method).is_some()
    }

    /// Returns true if any method is registered.
    #[must_use]
    pub fn has_any_method(&self) -> bool {
        !self.entries.is_empty()
    }

    /// Returns the registered methods in registration order.
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<Method> {
        self.entries.iter().map(|(method, _)| method.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_router_new() {
        let router: MethodRouter<u8> = MethodRouter::new();
        assert!(!router.has_any_method());
    }

    #[test]
    fn test_first_insert_wins() {
        let mut router = MethodRouter::new();
        assert!(router.insert(Method::GET, "original"));
        assert!(!router.insert(Method::GET, "second"));
        assert_eq!(router.get(&Method::GET), Some(&"original"));
    }

    #[test]
    fn test_extension_method() {
        let purge = Method::from_bytes(b"PURGE").unwrap();
        let mut router = MethodRouter::new();
        router.insert(purge.clone(), 1);
        assert_eq!(router.get(&purge), Some(&1));
    }

    #[test]
    fn test_allowed_methods_in_order() {
        let mut router = MethodRouter::new();
        router.insert(Method::POST, ());
        router.insert(Method::GET, ());
        router.insert(Method::DELETE, ());
        assert_eq!(
            router.allowed_methods(),
            vec![Method::POST, Method::GET, Method::DELETE]
        );
    }
}
