//! Tabsieve - filtering, ordering and paging for delimited-text data.
//!
//! Tabsieve evaluates composable predicates over rows read from CSV-like
//! files and over typed records, then sorts and pages the survivors. It
//! supports:
//!
//! - Four data shapes: positional rows, rows addressed by column name,
//!   structured records with a static field schema, and JSON documents
//! - Null, emptiness, equality, membership, regex and range tests, with
//!   case-insensitive variants and injectable comparators
//! - `and`, `or` and `not` combinators that can be nested to any depth
//! - Multi-key ordering with per-key direction and comparator
//! - Offset/limit paging applied after the full collection is sorted
//!
//! # Quick Start
//!
//! ```rust
//! use tabsieve::{CsvConfig, RowFilter, RowListing, RowReader};
//!
//! let data = "\
//! id,name,price
//! 1,bolt,0.10
//! 2,,1.50
//! 3,nut,0.05
//! 4,washer,NULL
//! ";
//!
//! let config = CsvConfig::new().null_token("NULL");
//! let mut reader = RowReader::from_reader(data.as_bytes(), &config)?;
//!
//! let listing = RowListing::new()
//!     .filter(
//!         RowFilter::new()
//!             .is_not_empty(1)
//!             .is_not_null(2),
//!     )
//!     .order_asc(2);
//!
//! let rows = reader.read_rows(&listing)?;
//! let names: Vec<_> = rows.iter().map(|r| r[1].as_deref().unwrap()).collect();
//! assert_eq!(names, ["nut", "bolt"]);
//! # Ok::<(), tabsieve::SieveError>(())
//! ```
//!
//! # Data Shapes
//!
//! | Shape | Item | Field key | Predicate alias |
//! |-------|------|-----------|-----------------|
//! | [`Positional`] | `[Option<String>]` | column index | [`RowPredicate`] |
//! | [`Named`] | [`NamedRow`] | column name | [`NamedRowPredicate`] |
//! | [`Structured<T>`] | `T: Record` | field name | [`RecordPredicate<T>`] |
//! | [`Dynamic`] | `serde_json::Value` | object key | [`JsonPredicate`] |
//!
//! Row values are strings, so ordering tests on rows compare text. Records
//! and JSON documents carry numbers, timestamps, booleans and enums, and
//! their leaves accept a [`Comparator`] (`gt_by`, `between_by`, ...).
//!
//! # Absent Values
//!
//! A `None` cell, a `None` record field and a JSON `null` are all absent.
//! Absent values are never equal to anything and never match a pattern or
//! range; only `is_null` and `is_empty` see them. When sorting they go last
//! in ascending order.
//!
//! # Records
//!
//! With the `derive` feature (on by default), `#[derive(Record)]` registers
//! a field schema once per type:
//!
//! ```rust
//! use tabsieve::{Record, RecordFilter, RecordListing};
//!
//! #[derive(Record)]
//! struct Quote {
//!     symbol: String,
//!     price: f64,
//! }
//!
//! let quotes = vec![
//!     Quote { symbol: "AAA".into(), price: 1088.70 },
//!     Quote { symbol: "BBB".into(), price: 999.00 },
//! ];
//!
//! let listing = RecordListing::<Quote>::new()
//!     .filter(RecordFilter::<Quote>::new().gt(Quote::PRICE, 1088.00)?)
//!     .order_desc(Quote::PRICE);
//!
//! let hits = listing.process(&quotes)?;
//! assert_eq!(hits.len(), 1);
//! assert_eq!(hits[0].symbol, "AAA");
//! # Ok::<(), tabsieve::SieveError>(())
//! ```
//!
//! # Errors
//!
//! Malformed predicates are rejected when they are built. Unknown columns,
//! unknown fields and out-of-range indexes are reported when an item is
//! evaluated, as is an `and`/`or` node with no children. Every error aborts
//! the operation; there is no partial result.

pub mod compare;
mod config;
mod error;
mod filter;
mod header;
mod listing;
mod op;
mod operand;
mod ordering;
mod predicate;
mod reader;
mod schema;
mod shape;
mod value;
mod writer;

// Re-export public API
pub use compare::Comparator;
pub use config::CsvConfig;
pub use error::{AccessError, Result, SieveError};
pub use filter::{Filter, JsonFilter, NamedRowFilter, RecordFilter, RowFilter};
pub use header::{Header, NamedRow, Row};
pub use listing::{page, JsonListing, Listing, NamedRowListing, RecordListing, RowListing};
pub use op::Op;
pub use operand::Operand;
pub use ordering::{compare_by, compare_values, sort_by_criteria, Dir, OrderBy};
pub use predicate::{
    JsonPredicate, NamedRowPredicate, Predicate, RecordPredicate, RowPredicate, TypedShape,
};
pub use reader::{RowReader, Rows};
pub use schema::{Getter, Record, Schema, SchemaBuilder, TryGetter};
pub use shape::{Dynamic, IntoKey, Named, Positional, Shape, Structured};
pub use value::{Number, Timestamp, ToValue, Value};
pub use writer::RowWriter;

// Re-export derive macro when feature is enabled
#[cfg(feature = "derive")]
pub use tabsieve_macros::Record;
