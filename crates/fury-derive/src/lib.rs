//! Derive macros for fury
//!
//! Provides `#[derive(Record)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod record;

/// Derive the `Record` trait for a struct with named fields.
///
/// # Example
///
/// ```ignore
/// use fury::Record;
///
/// #[derive(Debug, Default, Record)]
/// struct User {
///     #[orm(flags = "primary_key,auto_increment")]
///     user_id: i64,
///     username: String,
///     #[orm(ignore)]
///     cache: Vec<String>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(flags = "primary_key,auto_increment")]` - Comma-separated role flags
/// - `#[orm(ignore)]` - Skip the field in writes and when reading rows
///
/// # Generated
///
/// - `NAME` - Lowercased struct name, used as the table name
/// - A static field table in declaration order
/// - Index-based `value`, `is_zero` and `set_value` accessors
///
/// Non-ignored field types must implement `Clone`, `Into<fury::Value>`,
/// `fury::FromValue`, `PartialEq` and `Default`.
#[proc_macro_derive(Record, attributes(orm))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
