//! Procedural macros for Hermes.
//!
//! `#[derive(Schema)]` implements `hermes_core::Schema` for a struct with named
//! fields, producing one `(wire name, kind)` pair per field in declaration
//! order. Two lists are generated: `input_schema` as serde deserializes the
//! type and `output_schema` as it serializes it. The documentation endpoint
//! uses the first for operation inputs and the second for outputs.
//!
//! # Example
//!
//! ```rust,ignore
//! use hermes_macros::Schema;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Schema)]
//! #[serde(rename_all = "camelCase")]
//! struct SearchInput {
//!     query_text: String,          // "queryText": string
//!     max_results: Option<u32>,    // "maxResults": number
//!     #[serde(rename = "exact")]
//!     exact_match: bool,           // "exact": boolean
//!     #[serde(skip)]
//!     cache_key: u64,              // omitted
//!     filters: Vec<String>,        // "filters": object
//! }
//! ```
//!
//! # Naming
//!
//! The wire name follows serde: a field-level `rename` wins, then the
//! container's `rename_all`, then the field identifier (raw identifiers lose
//! their `r#` prefix). `rename(serialize = "..", deserialize = "..")` and the
//! same form of `rename_all` apply to the matching list only. Fields marked
//! `#[serde(skip)]` or `#[schema(skip)]` are left out of both lists;
//! `skip_deserializing` drops a field from the input list and
//! `skip_serializing` from the output list. `#[serde(flatten)]` fields are
//! reported as `object`.
//!
//! # Kinds
//!
//! Kinds are decided from the field's written type:
//!
//! - `String`, `str`, `char`, `Cow<str>`: `string`
//! - `i8`..`i128`, `u8`..`u128`, `isize`, `usize`, `f32`, `f64`, `NonZero*`: `number`
//! - `bool`: `boolean`
//! - `Option<T>`, `Box<T>`, `Rc<T>`, `Arc<T>`, `&T`: the kind of `T`
//! - anything else: `object`
//!
//! A type alias hides the underlying type from the macro; use
//! `#[schema(kind = "string")]` (or `number`, `boolean`, `object`) to state the
//! kind explicitly.
//!
//! Tuple structs, unit structs and enums have no named fields and describe
//! themselves as `None`.

mod parse;
mod schema;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `hermes_core::Schema`.
///
/// See the [crate documentation](crate) for naming and kind rules.
#[proc_macro_derive(Schema, attributes(schema))]
pub fn derive_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    schema::expand_schema(&input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
