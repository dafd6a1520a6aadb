extern crate proc_macro;

mod retrievable;
mod storable;

use proc_macro::TokenStream;

#[proc_macro_derive(Storable, attributes(storable))]
pub fn derive_storable(input: TokenStream) -> TokenStream {
    crate::storable::derive_storable(input)
}

#[proc_macro_derive(Retrievable, attributes(storable))]
pub fn derive_retrievable(input: TokenStream) -> TokenStream {
    crate::retrievable::derive_retrievable(input)
}

#[derive(Debug, Default)]
pub(crate) struct FieldAttribs {
    pub rename: Option<String>,
    pub default: bool,
    pub skip: bool,
}

pub(crate) fn parse_field_attribs(attrs: &[syn::Attribute]) -> FieldAttribs {
    use quote::ToTokens;
    use syn::{Lit, Meta, NestedMeta};

    let mut result = FieldAttribs::default();
    for attrib in attrs {
        if !attrib.path.is_ident("storable") {
            continue;
        }
        match attrib.parse_meta() {
            Err(error) => panic!(
                "Could not parse attribute `{}`: {:?}",
                attrib.to_token_stream(),
                error
            ),
            Ok(Meta::List(meta)) => {
                for meta in meta.nested {
                    match &meta {
                        NestedMeta::Meta(Meta::Path(path)) => {
                            if path.is_ident("default") {
                                result.default = true;
                            } else if path.is_ident("skip") {
                                result.skip = true;
                            }
                        }
                        NestedMeta::Meta(Meta::NameValue(meta)) => {
                            if meta.path.is_ident("rename") {
                                if let Lit::Str(value) = &meta.lit {
                                    result.rename = Some(value.value());
                                }
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
    result
}

/// Bounds every type parameter by the derived trait, so `Wrapper<T>` gets
/// `impl<T: Storable> Storable for Wrapper<T>`.
pub(crate) fn bounded_generics(
    generics: &syn::Generics,
    bound: syn::TypeParamBound,
) -> syn::Generics {
    let mut result = generics.clone();
    for param in result.type_params_mut() {
        param.bounds.push(bound.clone());
    }
    result
}
