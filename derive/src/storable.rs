use crate::{bounded_generics, parse_field_attribs};
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, parse_quote, Data, DeriveInput, Fields, Index};

pub fn derive_storable(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let name = &ast.ident;
    let generics = bounded_generics(
        &ast.generics,
        parse_quote!(serializable_data::Storable),
    );
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let body = match ast.data {
        Data::Struct(data) => match data.fields {
            Fields::Named(fields) => {
                let entries = fields.named.iter().filter_map(|field| {
                    let attribs = parse_field_attribs(&field.attrs);
                    if attribs.skip {
                        return None;
                    }
                    let ident = field.ident.as_ref()?;
                    let key = attribs.rename.unwrap_or_else(|| ident.to_string());
                    Some(quote! {
                        mapping.insert(
                            #key.to_owned(),
                            serializable_data::Storable::get_data(&self.#ident),
                        );
                    })
                });
                quote! {
                    let mut mapping = serializable_data::Mapping::new();
                    #( #entries )*
                    serializable_data::Value::Mapping(mapping)
                }
            }
            Fields::Unnamed(fields) => {
                let items = fields
                    .unnamed
                    .iter()
                    .enumerate()
                    .filter(|(_, field)| !parse_field_attribs(&field.attrs).skip)
                    .map(|(index, _)| Index::from(index))
                    .collect::<Vec<_>>();
                if items.len() == 1 {
                    let index = &items[0];
                    quote! {
                        serializable_data::Storable::get_data(&self.#index)
                    }
                } else {
                    quote! {
                        serializable_data::Value::Sequence(::std::vec![
                            #( serializable_data::Storable::get_data(&self.#items) ),*
                        ])
                    }
                }
            }
            Fields::Unit => quote! {
                serializable_data::Value::Absent
            },
        },
        _ => panic!("Storable can be derived only for structs"),
    };
    quote! {
        impl #impl_generics serializable_data::Storable for #name #ty_generics #where_clause {
            fn get_data(&self) -> serializable_data::Value {
                #body
            }
        }
    }
    .into()
}
