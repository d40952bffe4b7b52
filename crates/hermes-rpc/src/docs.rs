//! Operation catalog and the documentation endpoint.
//!
//! Every registration appends one [`DocEntry`] to the registrar's
//! [`Catalog`]. `GET /rpc/docs` serves the catalog as a JSON array in
//! registration order:
//!
//! ```json
//! [
//!   {
//!     "path": "/test",
//!     "httpMethod": "GET",
//!     "inputType": "query parameters",
//!     "input": {"input": "string"},
//!     "outputType": "json body",
//!     "output": {"output": "string"}
//!   }
//! ]
//! ```

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use hermes_core::{FieldKind, FieldSchema, RpcContext};
use hermes_middleware::{BoxFuture, Endpoint, Request, Response};

use crate::decode::InputSource;
use crate::respond::encode_output;

/// Default path of the documentation endpoint.
pub const DOCS_PATH: &str = "/rpc/docs";

/// Handler name the documentation endpoint runs under.
pub const DOCS_HANDLER_NAME: &str = "RpcDocs";

/// How every operation's output is described.
pub const OUTPUT_TYPE: &str = "json body";

/// Field name to kind, in declaration order.
pub type Shape = IndexMap<String, FieldKind>;

/// Documentation for one registered operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocEntry {
    /// The registered path pattern.
    pub path: String,
    /// The HTTP method, upper case.
    #[serde(rename = "httpMethod")]
    pub http_method: String,
    /// `"query parameters"` or `"json body"`.
    #[serde(rename = "inputType")]
    pub input_type: String,
    /// Input fields, or `null` for an unstructured input.
    pub input: Option<Shape>,
    /// Always `"json body"`.
    #[serde(rename = "outputType")]
    pub output_type: String,
    /// Output fields, or `null` for an unstructured output.
    pub output: Option<Shape>,
}

impl DocEntry {
    /// Builds the entry for an operation.
    #[must_use]
    pub fn new(
        method: &http::Method,
        path: &str,
        input: Option<Vec<FieldSchema>>,
        output: Option<Vec<FieldSchema>>,
    ) -> Self {
        Self {
            path: path.to_string(),
            http_method: method.as_str().to_string(),
            input_type: InputSource::for_method(method).doc_label().to_string(),
            input: input.map(to_shape),
            output_type: OUTPUT_TYPE.to_string(),
            output: output.map(to_shape),
        }
    }
}

fn to_shape(fields: Vec<FieldSchema>) -> Shape {
    fields
        .into_iter()
        .map(|field| (field.name.to_string(), field.kind))
        .collect()
}

/// Append-only list of [`DocEntry`] values shared by the registrar and the
/// documentation endpoint.
///
/// Clones share the same entries, so operations registered after the
/// endpoint was mounted are still listed.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Arc<RwLock<Vec<DocEntry>>>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&self, entry: DocEntry) {
        self.entries.write().push(entry);
    }

    /// A snapshot of all entries in registration order.
    #[must_use]
    pub fn entries(&self) -> Vec<DocEntry> {
        self.entries.read().clone()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

/// Serves the catalog as JSON. Reads the catalog on every request.
#[derive(Debug, Clone)]
pub struct DocsEndpoint {
    catalog: Catalog,
}

impl DocsEndpoint {
    /// Creates an endpoint over `catalog`.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }
}

impl Endpoint for DocsEndpoint {
    fn call<'a>(&'a self, _ctx: RpcContext, _request: Request) -> BoxFuture<'a, Response> {
        let response = encode_output(&*self.catalog.entries.read());
        Box::pin(async move { response })
    }
}
