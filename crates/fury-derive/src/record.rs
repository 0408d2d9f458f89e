//! Record derive macro implementation

use crate::attrs::field_attr;
use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let table = name.unraw().to_string().to_lowercase();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Record can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Record can only be derived for structs",
            ));
        }
    };

    let mut metas = Vec::new();
    let mut values = Vec::new();
    let mut zeros = Vec::new();
    let mut setters = Vec::new();

    for (index, field) in fields.iter().enumerate() {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let ty = &field.ty;
        let attr = field_attr(field)?;
        let column = ident.unraw().to_string().to_lowercase();
        let flags = &attr.flags;
        let ignore = attr.ignore;
        let idx = Literal::usize_unsuffixed(index);

        metas.push(quote! {
            fury::FieldMeta::new(#column, #flags, #ignore)
        });

        if ignore {
            continue;
        }

        values.push(quote! {
            #idx => fury::Value::from(::core::clone::Clone::clone(&self.#ident))
        });
        zeros.push(quote! {
            #idx => self.#ident == <#ty as ::core::default::Default>::default()
        });
        setters.push(quote! {
            #idx => {
                self.#ident = <#ty as fury::FromValue>::from_value(value)
                    .map_err(|e| fury::OrmError::decode(#column, e.to_string()))?;
                Ok(())
            }
        });
    }

    Ok(quote! {
        impl #impl_generics fury::Record for #name #ty_generics #where_clause {
            const NAME: &'static str = #table;

            fn fields() -> &'static [fury::FieldMeta] {
                const FIELDS: &[fury::FieldMeta] = &[#(#metas),*];
                FIELDS
            }

            fn value(&self, index: usize) -> fury::Value {
                match index {
                    #(#values,)*
                    _ => fury::Value::Null,
                }
            }

            fn is_zero(&self, index: usize) -> bool {
                match index {
                    #(#zeros,)*
                    _ => false,
                }
            }

            #[allow(unused_variables)]
            fn set_value(&mut self, index: usize, value: fury::Value) -> fury::OrmResult<()> {
                match index {
                    #(#setters)*
                    _ => Ok(()),
                }
            }
        }
    })
}
