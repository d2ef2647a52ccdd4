//! Implementation of the `#[derive(Record)]` macro.
//!
//! Generates one accessor function per field, a `OnceLock`-backed schema
//! and field name constants.

mod attrs;
mod derive;

pub use derive::record_derive_impl;
