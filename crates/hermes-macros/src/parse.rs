//! Attribute parsing for the `Schema` derive.
//!
//! Reads the subset of `#[serde(...)]` that changes wire names or hides
//! fields, plus the macro's own `#[schema(...)]` overrides. Every other serde
//! option is skipped without complaint since serde validates it anyway.

use syn::{
    meta::ParseNestedMeta, parse_quote, Attribute, Expr, GenericArgument, LitStr, Path,
    PathArguments, Token, Type, TypePath,
};

/// Coarse field kind, mirroring `hermes_core::FieldKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    String,
    Number,
    Boolean,
    Object,
}

impl Kind {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    /// Decides the kind from the written type of a field.
    pub fn of_type(ty: &Type) -> Self {
        match ty {
            Type::Reference(reference) => Self::of_type(&reference.elem),
            Type::Paren(paren) => Self::of_type(&paren.elem),
            Type::Group(group) => Self::of_type(&group.elem),
            Type::Path(TypePath { qself: None, path }) => {
                let Some(last) = path.segments.last() else {
                    return Self::Object;
                };
                match last.ident.to_string().as_str() {
                    "String" | "str" | "char" => Self::String,
                    "bool" => Self::Boolean,
                    "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32"
                    | "u64" | "u128" | "usize" | "f32" | "f64" => Self::Number,
                    other if other.starts_with("NonZero") => Self::Number,
                    "Option" | "Box" | "Rc" | "Arc" | "Cow" => {
                        first_type_argument(&last.arguments).map_or(Self::Object, Self::of_type)
                    }
                    _ => Self::Object,
                }
            }
            _ => Self::Object,
        }
    }
}

fn first_type_argument(arguments: &PathArguments) -> Option<&Type> {
    match arguments {
        PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        }),
        _ => None,
    }
}

/// Serde `rename_all` rules, applied to snake_case field identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    Lower,
    Upper,
    Pascal,
    Camel,
    Snake,
    ScreamingSnake,
    Kebab,
    ScreamingKebab,
}

impl RenameRule {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "lowercase" => Some(Self::Lower),
            "UPPERCASE" => Some(Self::Upper),
            "PascalCase" => Some(Self::Pascal),
            "camelCase" => Some(Self::Camel),
            "snake_case" => Some(Self::Snake),
            "SCREAMING_SNAKE_CASE" => Some(Self::ScreamingSnake),
            "kebab-case" => Some(Self::Kebab),
            "SCREAMING-KEBAB-CASE" => Some(Self::ScreamingKebab),
            _ => None,
        }
    }

    /// Applies the rule the way serde renames struct fields.
    pub fn apply(self, field: &str) -> String {
        match self {
            Self::Lower | Self::Snake => field.to_string(),
            Self::Upper | Self::ScreamingSnake => field.to_ascii_uppercase(),
            Self::Pascal => to_pascal(field),
            Self::Camel => {
                let pascal = to_pascal(field);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
                    None => pascal,
                }
            }
            Self::Kebab => field.replace('_', "-"),
            Self::ScreamingKebab => field.to_ascii_uppercase().replace('_', "-"),
        }
    }
}

fn to_pascal(field: &str) -> String {
    let mut pascal = String::with_capacity(field.len());
    let mut capitalize = true;
    for ch in field.chars() {
        if ch == '_' {
            capitalize = true;
        } else if capitalize {
            pascal.push(ch.to_ascii_uppercase());
            capitalize = false;
        } else {
            pascal.push(ch);
        }
    }
    pascal
}

/// Which side of serde a name or skip applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Encoding: what an output looks like on the wire.
    Serialize,
    /// Decoding: what an input must look like on the wire.
    Deserialize,
}

/// A serde option that may differ between serialization and deserialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directional<T> {
    pub serialize: Option<T>,
    pub deserialize: Option<T>,
}

impl<T> Default for Directional<T> {
    fn default() -> Self {
        Self {
            serialize: None,
            deserialize: None,
        }
    }
}

impl<T: Clone> Directional<T> {
    fn both(value: T) -> Self {
        Self {
            serialize: Some(value.clone()),
            deserialize: Some(value),
        }
    }

    pub fn get(&self, direction: Direction) -> Option<&T> {
        match direction {
            Direction::Serialize => self.serialize.as_ref(),
            Direction::Deserialize => self.deserialize.as_ref(),
        }
    }
}

/// Container-level options.
pub struct ContainerAttrs {
    pub rename_all: Directional<RenameRule>,
    /// Path of the `hermes_core` crate in generated code.
    pub crate_path: Path,
}

impl ContainerAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut rename_all = Directional::default();
        let mut crate_path: Path = parse_quote!(::hermes_core);

        for attr in attrs {
            if attr.path().is_ident("serde") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename_all") {
                        let names = directional_names(&meta)?;
                        let rule = |name: Option<String>| {
                            name.map(|name| {
                                RenameRule::from_name(&name).ok_or_else(|| {
                                    meta.error(format!("unknown rename rule: {name}"))
                                })
                            })
                            .transpose()
                        };
                        rename_all = Directional {
                            serialize: rule(names.serialize)?,
                            deserialize: rule(names.deserialize)?,
                        };
                        Ok(())
                    } else {
                        skip_meta(&meta)
                    }
                })?;
            } else if attr.path().is_ident("schema") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("crate") {
                        let lit: LitStr = meta.value()?.parse()?;
                        crate_path = lit.parse()?;
                        Ok(())
                    } else {
                        Err(meta.error("unknown schema container attribute"))
                    }
                })?;
            }
        }

        Ok(Self {
            rename_all,
            crate_path,
        })
    }
}

/// Field-level options.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    pub rename: Directional<String>,
    pub skip_serializing: bool,
    pub skip_deserializing: bool,
    pub flatten: bool,
    pub kind: Option<Kind>,
}

impl FieldAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();
        let mut schema_rename = None;

        for attr in attrs {
            if attr.path().is_ident("serde") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("rename") {
                        let names = directional_names(&meta)?;
                        if names.serialize.is_some() {
                            parsed.rename.serialize = names.serialize;
                        }
                        if names.deserialize.is_some() {
                            parsed.rename.deserialize = names.deserialize;
                        }
                    } else if meta.path.is_ident("skip") {
                        parsed.skip_serializing = true;
                        parsed.skip_deserializing = true;
                    } else if meta.path.is_ident("skip_serializing") {
                        parsed.skip_serializing = true;
                    } else if meta.path.is_ident("skip_deserializing") {
                        parsed.skip_deserializing = true;
                    } else if meta.path.is_ident("flatten") {
                        parsed.flatten = true;
                    } else {
                        skip_meta(&meta)?;
                    }
                    Ok(())
                })?;
            } else if attr.path().is_ident("schema") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("skip") {
                        parsed.skip_serializing = true;
                        parsed.skip_deserializing = true;
                        Ok(())
                    } else if meta.path.is_ident("rename") {
                        let lit: LitStr = meta.value()?.parse()?;
                        schema_rename = Some(lit.value());
                        Ok(())
                    } else if meta.path.is_ident("kind") {
                        let lit: LitStr = meta.value()?.parse()?;
                        parsed.kind = Some(Kind::from_name(&lit.value()).ok_or_else(|| {
                            syn::Error::new(
                                lit.span(),
                                "expected one of: string, number, boolean, object",
                            )
                        })?);
                        Ok(())
                    } else {
                        Err(meta.error("unknown schema field attribute"))
                    }
                })?;
            }
        }

        if let Some(name) = schema_rename {
            parsed.rename = Directional::both(name);
        }
        Ok(parsed)
    }

    /// Whether serde leaves this field out in `direction`.
    pub const fn is_skipped(&self, direction: Direction) -> bool {
        match direction {
            Direction::Serialize => self.skip_serializing,
            Direction::Deserialize => self.skip_deserializing,
        }
    }
}

/// Reads `key = "value"` or `key(serialize = "..", deserialize = "..")`.
///
/// The plain form applies to both directions. The nested form may name only
/// one of them.
fn directional_names(meta: &ParseNestedMeta) -> syn::Result<Directional<String>> {
    if meta.input.peek(Token![=]) {
        let lit: LitStr = meta.value()?.parse()?;
        return Ok(Directional::both(lit.value()));
    }

    let mut names = Directional::default();
    meta.parse_nested_meta(|inner| {
        let lit: LitStr = inner.value()?.parse()?;
        if inner.path.is_ident("serialize") {
            names.serialize = Some(lit.value());
        } else if inner.path.is_ident("deserialize") {
            names.deserialize = Some(lit.value());
        }
        Ok(())
    })?;
    Ok(names)
}

/// Consumes the value of a serde option the derive does not care about.
fn skip_meta(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        let _: Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in meta.input);
        let _: proc_macro2::TokenStream = content.parse()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_rules() {
        assert_eq!(RenameRule::Camel.apply("user_id"), "userId");
        assert_eq!(RenameRule::Pascal.apply("user_id"), "UserId");
        assert_eq!(RenameRule::Kebab.apply("user_id"), "user-id");
        assert_eq!(RenameRule::ScreamingSnake.apply("user_id"), "USER_ID");
        assert_eq!(RenameRule::ScreamingKebab.apply("user_id"), "USER-ID");
        assert_eq!(RenameRule::Lower.apply("user_id"), "user_id");
        assert_eq!(RenameRule::Camel.apply("id"), "id");
    }

    #[test]
    fn test_kind_of_type() {
        let cases: [(Type, Kind); 9] = [
            (parse_quote!(String), Kind::String),
            (parse_quote!(&'static str), Kind::String),
            (parse_quote!(std::borrow::Cow<'a, str>), Kind::String),
            (parse_quote!(u64), Kind::Number),
            (parse_quote!(std::num::NonZeroU32), Kind::Number),
            (parse_quote!(Option<f32>), Kind::Number),
            (parse_quote!(Box<bool>), Kind::Boolean),
            (parse_quote!(Vec<String>), Kind::Object),
            (parse_quote!(HashMap<String, u8>), Kind::Object),
        ];
        for (ty, expected) in cases {
            assert_eq!(Kind::of_type(&ty), expected);
        }
    }

    #[test]
    fn test_field_attrs_serde_rename_and_skip() {
        let attrs: Vec<Attribute> = vec![
            parse_quote!(#[serde(rename = "HTTPCode", default)]),
            parse_quote!(#[serde(with = "custom")]),
        ];
        let parsed = FieldAttrs::from_attrs(&attrs).unwrap();
        assert_eq!(
            parsed.rename.get(Direction::Deserialize).map(String::as_str),
            Some("HTTPCode")
        );
        assert_eq!(
            parsed.rename.get(Direction::Serialize).map(String::as_str),
            Some("HTTPCode")
        );
        assert!(!parsed.is_skipped(Direction::Serialize));

        let attrs: Vec<Attribute> = vec![parse_quote!(#[serde(skip)])];
        let parsed = FieldAttrs::from_attrs(&attrs).unwrap();
        assert!(parsed.is_skipped(Direction::Serialize));
        assert!(parsed.is_skipped(Direction::Deserialize));
    }

    #[test]
    fn test_field_attrs_one_sided_skip() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[serde(skip_deserializing)])];
        let parsed = FieldAttrs::from_attrs(&attrs).unwrap();
        assert!(parsed.is_skipped(Direction::Deserialize));
        assert!(!parsed.is_skipped(Direction::Serialize));
    }

    #[test]
    fn test_field_attrs_nested_rename() {
        let attrs: Vec<Attribute> = vec![parse_quote!(
            #[serde(rename(serialize = "out", deserialize = "in"))]
        )];
        let parsed = FieldAttrs::from_attrs(&attrs).unwrap();
        assert_eq!(parsed.rename.serialize.as_deref(), Some("out"));
        assert_eq!(parsed.rename.deserialize.as_deref(), Some("in"));

        let attrs: Vec<Attribute> = vec![parse_quote!(#[serde(rename(deserialize = "in"))])];
        let parsed = FieldAttrs::from_attrs(&attrs).unwrap();
        assert_eq!(parsed.rename.serialize, None);
        assert_eq!(parsed.rename.deserialize.as_deref(), Some("in"));
    }

    #[test]
    fn test_schema_kind_override() {
        let attrs: Vec<Attribute> = vec![parse_quote!(#[schema(kind = "number")])];
        assert_eq!(
            FieldAttrs::from_attrs(&attrs).unwrap().kind,
            Some(Kind::Number)
        );

        let attrs: Vec<Attribute> = vec![parse_quote!(#[schema(kind = "date")])];
        assert!(FieldAttrs::from_attrs(&attrs).is_err());
    }

    #[test]
    fn test_container_rename_all() {
        let attrs: Vec<Attribute> = vec![parse_quote!(
            #[serde(deny_unknown_fields, rename_all = "camelCase")]
        )];
        let parsed = ContainerAttrs::from_attrs(&attrs).unwrap();
        assert_eq!(parsed.rename_all, Directional::both(RenameRule::Camel));

        let attrs: Vec<Attribute> = vec![parse_quote!(
            #[serde(rename_all(serialize = "PascalCase"))]
        )];
        let parsed = ContainerAttrs::from_attrs(&attrs).unwrap();
        assert_eq!(parsed.rename_all.get(Direction::Serialize), Some(&RenameRule::Pascal));
        assert_eq!(parsed.rename_all.get(Direction::Deserialize), None);
    }
}
