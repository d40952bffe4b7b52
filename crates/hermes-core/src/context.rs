//! Request-scoped context.
//!
//! An [`RpcContext`] is created for every inbound request and passed by value
//! through every middleware stage into the handler. It is immutable: the
//! `with_*` methods return a derived context and leave the original untouched,
//! so a stage can only influence what runs *downstream* of it.

use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// # Example
///
/// ```
/// use hermes_core::RequestId;
///
/// let id = RequestId::new();
/// assert_eq!(id.to_string().len(), 36);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new time-ordered request ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

type Values = HashMap<TypeId, Arc<dyn Any + Send + Sync>>;

/// Immutable per-request context.
///
/// Cloning is cheap: the value map is shared behind an `Arc` and only copied
/// when a derived context adds a value.
///
/// # Example
///
/// ```
/// use hermes_core::RpcContext;
///
/// #[derive(Debug, PartialEq)]
/// struct Tenant(&'static str);
///
/// let root = RpcContext::new();
/// let named = root.with_handler_name("GetUser").with_value(Tenant("acme"));
///
/// assert_eq!(root.handler_name(), None);
/// assert_eq!(named.handler_name(), Some("GetUser"));
/// assert_eq!(named.value::<Tenant>(), Some(&Tenant("acme")));
/// ```
#[derive(Clone, Default)]
pub struct RpcContext {
    handler_name: Option<&'static str>,
    request_id: Option<RequestId>,
    values: Arc<Values>,
}

impl RpcContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a derived context carrying the handler's declared name.
    #[must_use]
    pub fn with_handler_name(&self, name: &'static str) -> Self {
        Self {
            handler_name: Some(name),
            ..self.clone()
        }
    }

    /// The name of the handler serving this request, once resolved.
    pub fn handler_name(&self) -> Option<&'static str> {
        self.handler_name
    }

    /// Returns a derived context carrying a request ID.
    #[must_use]
    pub fn with_request_id(&self, request_id: RequestId) -> Self {
        Self {
            request_id: Some(request_id),
            ..self.clone()
        }
    }

    /// The request ID, if a stage assigned one.
    pub fn request_id(&self) -> Option<RequestId> {
        self.request_id
    }

    /// Returns a derived context with `value` stored under its type.
    ///
    /// A value of the same type already present is shadowed in the derived
    /// context only.
    #[must_use]
    pub fn with_value<T: Send + Sync + 'static>(&self, value: T) -> Self {
        let mut values = Values::clone(&self.values);
        values.insert(TypeId::of::<T>(), Arc::new(value));
        Self {
            values: Arc::new(values),
            ..self.clone()
        }
    }

    /// Looks up a value by type.
    pub fn value<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
    }
}

impl fmt::Debug for RpcContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcContext")
            .field("handler_name", &self.handler_name)
            .field("request_id", &self.request_id)
            .field("values", &self.values.len())
            .finish()
    }
}
