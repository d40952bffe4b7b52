//! Wire-level shape descriptions for handler inputs and outputs.
//!
//! The documentation endpoint lists every field of an operation's input and
//! output as a `(wire name, kind)` pair. Types describe themselves through the
//! [`Schema`] trait, normally via `#[derive(Schema)]` from `hermes-macros`,
//! which reads serde renames so the listed names match what goes over the wire.
//!
//! Kinds are deliberately coarse:
//!
//! | Rust type | Kind |
//! |-----------|------|
//! | `String`, `&str`, `char`, `Cow<str>` | `string` |
//! | integers and floats of any width | `number` |
//! | `bool` | `boolean` |
//! | everything else | `object` |
//!
//! `Option<T>` and `Box<T>` describe `T`.

use serde::{Deserialize, Serialize};

/// Coarse JSON kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Textual values.
    String,
    /// Integers and floating point values.
    Number,
    /// `true` / `false`.
    Boolean,
    /// Nested records, sequences, maps and anything else.
    Object,
}

impl FieldKind {
    /// The lowercase wire name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field of a record as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSchema {
    /// Wire name (serde rename if any, otherwise the field name).
    pub name: &'static str,
    /// Coarse kind.
    pub kind: FieldKind,
}

impl FieldSchema {
    /// Creates a field descriptor.
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Types that can describe their fields.
///
/// serde may name or skip a field differently when decoding than when
/// encoding, so a type describes both views. `None` means the type has no
/// structured shape; the documentation endpoint renders it as `null`.
pub trait Schema {
    /// Fields a client sends when this type is decoded, in declaration order.
    fn input_schema() -> Option<Vec<FieldSchema>>;

    /// Fields a client receives when this type is encoded, in declaration order.
    fn output_schema() -> Option<Vec<FieldSchema>>;
}

macro_rules! shapeless {
    ($($ty:ty),*) => {
        $(
            impl Schema for $ty {
                fn input_schema() -> Option<Vec<FieldSchema>> {
                    None
                }

                fn output_schema() -> Option<Vec<FieldSchema>> {
                    None
                }
            }
        )*
    };
}

/// Unit input type for operations that take no parameters.
///
/// Decodes from an empty query string or from `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// Unit output type for operations with nothing to return. Encodes as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoContent {}

shapeless!(Empty, NoContent, (), serde_json::Value);

impl<T: Schema> Schema for Box<T> {
    fn input_schema() -> Option<Vec<FieldSchema>> {
        T::input_schema()
    }

    fn output_schema() -> Option<Vec<FieldSchema>> {
        T::output_schema()
    }
}
