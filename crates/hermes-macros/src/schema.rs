//! Code generation for `#[derive(Schema)]`.

use crate::parse::{ContainerAttrs, Direction, FieldAttrs, Kind};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{ext::IdentExt, Data, DataStruct, DeriveInput, Field, Fields, Path};

/// Expands the derive into an `impl Schema for ...` block.
///
/// The input view uses deserialize names and skips, the output view the
/// serialize ones.
pub fn expand_schema(input: &DeriveInput) -> syn::Result<TokenStream> {
    let container = ContainerAttrs::from_attrs(&input.attrs)?;
    let krate = &container.crate_path;
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let (input_body, output_body) = match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(named),
            ..
        }) => {
            let fields = named
                .named
                .iter()
                .map(|field| Ok((field, FieldAttrs::from_attrs(&field.attrs)?)))
                .collect::<syn::Result<Vec<_>>>()?;
            (
                field_list(&container, &fields, Direction::Deserialize),
                field_list(&container, &fields, Direction::Serialize),
            )
        }
        Data::Struct(_) | Data::Enum(_) => {
            let none = quote! { ::core::option::Option::None };
            (none.clone(), none)
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span,
                "Schema cannot be derived for unions",
            ))
        }
    };

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics #krate::Schema for #name #ty_generics #where_clause {
            fn input_schema() -> ::core::option::Option<::std::vec::Vec<#krate::FieldSchema>> {
                #input_body
            }

            fn output_schema() -> ::core::option::Option<::std::vec::Vec<#krate::FieldSchema>> {
                #output_body
            }
        }
    })
}

fn field_list(
    container: &ContainerAttrs,
    fields: &[(&Field, FieldAttrs)],
    direction: Direction,
) -> TokenStream {
    let krate = &container.crate_path;
    let entries = fields.iter().filter_map(|(field, attrs)| {
        if attrs.is_skipped(direction) {
            return None;
        }
        let ident = field.ident.as_ref()?;

        let wire_name = attrs.rename.get(direction).cloned().unwrap_or_else(|| {
            let raw = ident.unraw().to_string();
            match container.rename_all.get(direction) {
                Some(rule) => rule.apply(&raw),
                None => raw,
            }
        });
        let kind = attrs.kind.unwrap_or_else(|| {
            if attrs.flatten {
                Kind::Object
            } else {
                Kind::of_type(&field.ty)
            }
        });
        let kind = kind_tokens(krate, kind);

        Some(quote! { #krate::FieldSchema::new(#wire_name, #kind) })
    });
    quote! { ::core::option::Option::Some(::std::vec![#(#entries),*]) }
}

fn kind_tokens(krate: &Path, kind: Kind) -> TokenStream {
    match kind {
        Kind::String => quote! { #krate::FieldKind::String },
        Kind::Number => quote! { #krate::FieldKind::Number },
        Kind::Boolean => quote! { #krate::FieldKind::Boolean },
        Kind::Object => quote! { #krate::FieldKind::Object },
    }
}
