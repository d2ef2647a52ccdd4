//! Field resolution for the supported data shapes.
//!
//! A [`Shape`] is a zero-sized marker that tells the engine what an item looks
//! like and how a field key locates a value inside it. Predicates, orderings
//! and listings are generic over the shape, so the same comparison logic runs
//! against every shape:
//!
//! | Shape | Item | Key |
//! |-------|------|-----|
//! | [`Positional`] | `[Option<String>]` | column index |
//! | [`Named`] | [`NamedRow`] | column name |
//! | [`Structured<T>`] | `T: Record` | field name |
//! | [`Dynamic`] | `serde_json::Value` | object key |

use std::fmt;
use std::marker::PhantomData;

use crate::error::{Result, SieveError};
use crate::header::NamedRow;
use crate::schema::Record;
use crate::value::{Number, Value};

/// A data shape the engine can resolve fields against.
pub trait Shape: 'static {
    /// Field reference for this shape.
    type Key: Clone + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// The item a predicate is evaluated against.
    type Item: ?Sized;

    /// Resolves `key` against `item`.
    fn resolve<'a>(item: &'a Self::Item, key: &Self::Key) -> Result<Value<'a>>;
}

/// Conversion into a shape's field key.
///
/// Lets positional constructors take integer literals and named
/// constructors take `&str` or `String`.
pub trait IntoKey<K> {
    /// Performs the conversion.
    fn into_key(self) -> K;
}

impl IntoKey<usize> for usize {
    fn into_key(self) -> usize {
        self
    }
}

impl IntoKey<String> for &str {
    fn into_key(self) -> String {
        self.to_string()
    }
}

impl IntoKey<String> for String {
    fn into_key(self) -> String {
        self
    }
}

impl IntoKey<String> for &String {
    fn into_key(self) -> String {
        self.clone()
    }
}

/// A row of raw values, addressed by column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Positional {}

impl Shape for Positional {
    type Key = usize;
    type Item = [Option<String>];

    fn resolve<'a>(item: &'a [Option<String>], key: &usize) -> Result<Value<'a>> {
        let cell = item.get(*key).ok_or(SieveError::InvalidIndex {
            index: *key,
            len: item.len(),
        })?;
        Ok(cell.as_deref().map_or(Value::None, Value::String))
    }
}

/// A row paired with its header, addressed by column name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Named {}

impl Shape for Named {
    type Key = String;
    type Item = NamedRow;

    fn resolve<'a>(item: &'a NamedRow, key: &String) -> Result<Value<'a>> {
        let index = item
            .header()
            .position(key)
            .ok_or_else(|| SieveError::UnknownColumn { name: key.clone() })?;
        Positional::resolve(item.values(), &index)
    }
}

/// A structured record, addressed through its registered [`Schema`](crate::Schema).
pub struct Structured<T>(PhantomData<fn() -> T>);

impl<T: Record> Shape for Structured<T> {
    type Key = String;
    type Item = T;

    fn resolve<'a>(item: &'a T, key: &String) -> Result<Value<'a>> {
        T::schema().resolve(item, key)
    }
}

/// A JSON document, addressed by top-level object key.
///
/// Fields are discovered at evaluation time, so a missing key is reported as
/// [`SieveError::UnknownField`] and a document that is not an object as
/// [`SieveError::FieldAccess`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dynamic {}

const JSON_RECORD: &str = "json object";

impl Shape for Dynamic {
    type Key = String;
    type Item = serde_json::Value;

    fn resolve<'a>(item: &'a serde_json::Value, key: &String) -> Result<Value<'a>> {
        let object = item.as_object().ok_or_else(|| SieveError::FieldAccess {
            record: JSON_RECORD,
            field: key.clone(),
            source: format!("expected an object, found {}", json_kind(item)).into(),
        })?;
        let value = object.get(key).ok_or_else(|| SieveError::UnknownField {
            record: JSON_RECORD,
            field: key.clone(),
        })?;
        Ok(json_value(value))
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

fn json_value(value: &serde_json::Value) -> Value<'_> {
    match value {
        serde_json::Value::Null => Value::None,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(Number::I64(i))
            } else if let Some(u) = n.as_u64() {
                Value::Number(Number::U64(u))
            } else {
                n.as_f64()
                    .map_or(Value::None, |f| Value::Number(Number::F64(f)))
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => Value::Collection(items.len()),
        serde_json::Value::Object(map) => Value::Collection(map.len()),
    }
}
