//! Proc macros for tabsieve.
//!
//! # Available Macros
//!
//! - [`Record`] - Register a static field schema so a struct can be
//!   filtered and ordered by field name

mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives the `Record` trait for filterable structs.
///
/// Every named field is registered under its own name, read through
/// `ToValue`. The schema is built on first use and cached for the life of
/// the program.
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `skip` | Exclude this field from the schema |
/// | `rename = "..."` | Register the field under a different name |
///
/// # Generated Code
///
/// The macro generates:
///
/// 1. Field name constants (e.g., `Trade::PRICE`, `Trade::SETTLED_AT`)
/// 2. An implementation of `Record::schema()` backed by a `OnceLock`
///
/// # Example
///
/// ```ignore
/// use tabsieve::{Record, RecordFilter};
///
/// #[derive(Record)]
/// struct Trade {
///     symbol: String,
///     price: f64,
///     #[record(rename = "qty")]
///     quantity: u32,
///     #[record(skip)]
///     internal_id: u64,
/// }
///
/// let filter = RecordFilter::<Trade>::new()
///     .eq(Trade::SYMBOL, "ACME")?
///     .ge(Trade::QTY, 100)?;
/// ```
///
/// Field types must implement `tabsieve::ToValue`. Implement it for your
/// own enums and timestamp types.
///
/// Only structs with named fields and no generic parameters are supported.
/// Two fields registered under the same name are a compile error.
#[proc_macro_derive(Record, attributes(record))]
pub fn record_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    record::record_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
