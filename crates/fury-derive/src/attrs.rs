//! Field-level `#[orm(...)]` attribute parsing.

use syn::Result;

/// Parsed `#[orm(...)]` contents of one field.
#[derive(Default)]
pub(crate) struct FieldAttr {
    pub flags: String,
    pub ignore: bool,
}

impl syn::parse::Parse for FieldAttr {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        while !input.is_empty() {
            let ident: syn::Ident = input.parse()?;
            if ident == "ignore" {
                attr.ignore = true;
            } else if ident == "flags" {
                let _: syn::Token![=] = input.parse()?;
                let value: syn::LitStr = input.parse()?;
                attr.flags = value.value();
            } else {
                return Err(syn::Error::new_spanned(
                    ident,
                    "expected `flags = \"...\"` or `ignore`",
                ));
            }

            if input.is_empty() {
                break;
            }
            let _: syn::Token![,] = input.parse()?;
        }

        Ok(attr)
    }
}

/// Merge every `#[orm(...)]` attribute on `field`.
pub(crate) fn field_attr(field: &syn::Field) -> Result<FieldAttr> {
    let mut merged = FieldAttr::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        let parsed: FieldAttr = attr.parse_args()?;
        if !parsed.flags.is_empty() {
            merged.flags = parsed.flags;
        }
        merged.ignore |= parsed.ignore;
    }
    Ok(merged)
}
