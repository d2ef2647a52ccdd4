//! Implementation of the `#[derive(Record)]` macro.
//!
//! This macro generates an implementation of the `Record` trait and
//! field name constants for type-safe predicate building.

use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::parse_record_attrs;

/// Main implementation of the Record derive macro.
pub fn record_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "Record cannot be derived for generic structs",
        ));
    }

    // Ensure we have a struct with named fields
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Record can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Record can only be derived for structs",
            ))
        }
    };

    let mut getters: Vec<TokenStream> = Vec::new();
    let mut registrations: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();
    let mut seen_names: HashSet<String> = HashSet::new();
    let mut seen_constants: HashSet<String> = HashSet::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_record_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        // Raw identifiers register without their prefix
        let ident_text = field_name.to_string();
        let default_name = ident_text
            .strip_prefix("r#")
            .unwrap_or(&ident_text)
            .to_string();
        let record_name = attrs.rename.unwrap_or(default_name);

        if !seen_names.insert(record_name.clone()) {
            return Err(Error::new(
                field.span(),
                format!("duplicate record field name '{}'", record_name),
            ));
        }

        let const_text = to_constant_name(&record_name);
        if !seen_constants.insert(const_text.clone()) {
            return Err(Error::new(
                field.span(),
                format!(
                    "field name '{}' maps to constant {} which is already taken",
                    record_name, const_text
                ),
            ));
        }
        let const_name = format_ident!("{}", const_text);

        field_constants.push(quote! {
            /// Field name constant for type-safe predicates.
            pub const #const_name: &'static str = #record_name;
        });

        let getter = format_ident!("__tabsieve_get_{}", const_text.to_lowercase());
        getters.push(quote! {
            fn #getter(record: &#struct_name) -> ::tabsieve::Value<'_> {
                ::tabsieve::ToValue::to_value(&record.#field_name)
            }
        });
        registrations.push(quote! {
            .field(#record_name, #getter)
        });
    }

    let expanded = quote! {
        impl #struct_name {
            #(#field_constants)*
        }

        impl ::tabsieve::Record for #struct_name {
            fn schema() -> &'static ::tabsieve::Schema<Self> {
                #(#getters)*

                static SCHEMA: ::std::sync::OnceLock<::tabsieve::Schema<#struct_name>> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    ::tabsieve::Schema::builder()
                        #(#registrations)*
                        .build()
                })
            }
        }
    };

    Ok(expanded)
}

/// Convert a field name to a SCREAMING_SNAKE_CASE constant name.
///
/// Characters that cannot appear in an identifier become underscores, and
/// a leading digit gets a `FIELD_` prefix.
fn to_constant_name(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c.is_alphanumeric() {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = c.is_lowercase();
        } else {
            result.push('_');
            prev_was_lower = false;
        }
    }

    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert_str(0, "FIELD_");
    }
    result
}
