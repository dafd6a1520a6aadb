use crate::{bounded_generics, parse_field_attribs};
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Fields, Ident, Type};

/// Reads one field out of `value`, which is `Absent` when the entry is
/// missing. Types that accept `Absent` (such as `Option`) make the entry
/// optional.
fn read_field(
    type_name: &Ident,
    key: &str,
    ty: &Type,
    default: bool,
) -> proc_macro2::TokenStream {
    if default {
        quote! {
            <#ty as serializable_data::Retrievable>::from_data(value).unwrap_or_default()
        }
    } else {
        let description = format!("{}.{}", type_name, key);
        quote! {
            match <#ty as serializable_data::Retrievable>::from_data(value) {
                Some(value) => value,
                None if value.is_absent() => {
                    return Err(serializable_data::Error::MissingRequiredField(#key.to_owned()));
                }
                None => {
                    return Err(serializable_data::Error::FailedToInitializeObject(
                        #description.to_owned(),
                    ));
                }
            }
        }
    }
}

pub fn derive_retrievable(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let name = &ast.ident;
    let generics = bounded_generics(
        &ast.generics,
        parse_quote!(serializable_data::Retrievable),
    );
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let body = match ast.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => {
                let inits = fields.named.iter().map(|field| {
                    let attribs = parse_field_attribs(&field.attrs);
                    let ident = field.ident.as_ref().expect("named field");
                    if attribs.skip {
                        return quote! {
                            #ident: ::std::default::Default::default()
                        };
                    }
                    let key = attribs.rename.unwrap_or_else(|| ident.to_string());
                    let read = read_field(name, &key, &field.ty, attribs.default);
                    quote! {
                        #ident: {
                            let value = mapping.get(#key).unwrap_or(&absent);
                            #read
                        }
                    }
                });
                quote! {
                    let absent = serializable_data::Value::Absent;
                    let mapping = match data.as_mapping() {
                        Some(mapping) => mapping,
                        None => {
                            return Err(serializable_data::Error::type_mismatch(
                                "mapping",
                                data.kind(),
                            ));
                        }
                    };
                    Ok(Self {
                        #( #inits ),*
                    })
                }
            }
            Fields::Unnamed(fields) => {
                let kept = fields
                    .unnamed
                    .iter()
                    .filter(|field| !parse_field_attribs(&field.attrs).skip)
                    .count();
                let mut position = 0usize;
                let inits = fields
                    .unnamed
                    .iter()
                    .map(|field| {
                        let attribs = parse_field_attribs(&field.attrs);
                        if attribs.skip {
                            return quote! { ::std::default::Default::default() };
                        }
                        let key = position.to_string();
                        let read = read_field(name, &key, &field.ty, attribs.default);
                        let source = if kept == 1 {
                            quote! { data }
                        } else {
                            quote! { items.get(#position).unwrap_or(&absent) }
                        };
                        position += 1;
                        quote! {
                            {
                                let value = #source;
                                #read
                            }
                        }
                    })
                    .collect::<Vec<_>>();
                let items = if kept == 1 {
                    quote! {}
                } else {
                    quote! {
                        let items = match data.as_sequence() {
                            Some(items) => items,
                            None => {
                                return Err(serializable_data::Error::type_mismatch(
                                    "sequence",
                                    data.kind(),
                                ));
                            }
                        };
                    }
                };
                quote! {
                    #[allow(unused_variables)]
                    let absent = serializable_data::Value::Absent;
                    #items
                    Ok(Self( #( #inits ),* ))
                }
            }
            Fields::Unit => quote! {
                let _ = data;
                Ok(Self)
            },
        },
        _ => panic!("Retrievable can be derived only for structs"),
    };
    quote! {
        impl #impl_generics serializable_data::Retrievable for #name #ty_generics #where_clause {
            fn from_data(data: &serializable_data::Value) -> Option<Self> {
                <Self as serializable_data::Retrievable>::try_from_data(data).ok()
            }

            fn try_from_data(
                data: &serializable_data::Value,
            ) -> serializable_data::Result<Self> {
                #body
            }
        }
    }
    .into()
}
