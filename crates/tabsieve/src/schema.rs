//! Static field schemas for structured records.
//!
//! A [`Schema`] is a table of named accessor functions registered once per
//! record type. The [`Record`] trait hands the engine that table, usually
//! through `#[derive(Record)]`, so no field discovery happens while
//! predicates run.

use std::any::type_name;
use std::collections::HashMap;
use std::fmt;

use crate::error::{AccessError, Result, SieveError};
use crate::value::Value;

/// Infallible field accessor.
pub type Getter<T> = for<'a> fn(&'a T) -> Value<'a>;

/// Fallible field accessor. Errors surface as [`SieveError::FieldAccess`].
pub type TryGetter<T> = for<'a> fn(&'a T) -> std::result::Result<Value<'a>, AccessError>;

enum Accessor<T> {
    Plain(Getter<T>),
    Fallible(TryGetter<T>),
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Accessor<T> {}

/// Trait for types that can be filtered and ordered by field name.
///
/// Usually derived with `#[derive(Record)]`, but can be implemented by hand:
///
/// ```
/// use std::sync::OnceLock;
/// use tabsieve::{Record, Schema, ToValue, Value};
///
/// struct Trade {
///     symbol: String,
///     price: f64,
/// }
///
/// fn symbol(t: &Trade) -> Value<'_> {
///     t.symbol.to_value()
/// }
///
/// fn price(t: &Trade) -> Value<'_> {
///     t.price.to_value()
/// }
///
/// impl Record for Trade {
///     fn schema() -> &'static Schema<Self> {
///         static SCHEMA: OnceLock<Schema<Trade>> = OnceLock::new();
///         SCHEMA.get_or_init(|| {
///             Schema::builder()
///                 .field("symbol", symbol)
///                 .field("price", price)
///                 .build()
///         })
///     }
/// }
///
/// let trade = Trade { symbol: "ACME".into(), price: 10.5 };
/// assert_eq!(trade.field_value("symbol").unwrap(), Value::String("ACME"));
/// assert!(trade.field_value("volume").is_err());
/// ```
pub trait Record: Sized + 'static {
    /// Returns the schema registered for this type.
    fn schema() -> &'static Schema<Self>;

    /// Resolves a field by name.
    fn field_value(&self, field: &str) -> Result<Value<'_>> {
        Self::schema().resolve(self, field)
    }
}

/// Named accessors for a record type.
pub struct Schema<T> {
    fields: Vec<(String, Accessor<T>)>,
    index: HashMap<String, usize>,
}

impl<T> Schema<T> {
    /// Starts an empty schema.
    pub fn builder() -> SchemaBuilder<T> {
        SchemaBuilder { fields: Vec::new() }
    }

    /// Returns the registered field names in registration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Returns `true` if a field with this name is registered.
    pub fn contains(&self, field: &str) -> bool {
        self.index.contains_key(field)
    }

    /// Number of registered fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no field is registered.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Reads a field from a record.
    pub fn resolve<'a>(&self, record: &'a T, field: &str) -> Result<Value<'a>> {
        let pos = self
            .index
            .get(field)
            .copied()
            .ok_or_else(|| SieveError::UnknownField {
                record: type_name::<T>(),
                field: field.to_string(),
            })?;
        match self.fields[pos].1 {
            Accessor::Plain(get) => Ok(get(record)),
            Accessor::Fallible(get) => get(record).map_err(|source| SieveError::FieldAccess {
                record: type_name::<T>(),
                field: field.to_string(),
                source,
            }),
        }
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("record", &type_name::<T>())
            .field("fields", &self.field_names().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`Schema`].
pub struct SchemaBuilder<T> {
    fields: Vec<(String, Accessor<T>)>,
}

impl<T> SchemaBuilder<T> {
    /// Registers an infallible accessor.
    ///
    /// Registering a name twice replaces the earlier accessor.
    pub fn field(self, name: impl Into<String>, getter: Getter<T>) -> Self {
        self.register(name.into(), Accessor::Plain(getter))
    }

    /// Registers a fallible accessor.
    pub fn try_field(self, name: impl Into<String>, getter: TryGetter<T>) -> Self {
        self.register(name.into(), Accessor::Fallible(getter))
    }

    fn register(mut self, name: String, accessor: Accessor<T>) -> Self {
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = accessor,
            None => self.fields.push((name, accessor)),
        }
        self
    }

    /// Finalizes the schema.
    pub fn build(self) -> Schema<T> {
        let index = self
            .fields
            .iter()
            .enumerate()
            .map(|(pos, (name, _))| (name.clone(), pos))
            .collect();
        Schema {
            fields: self.fields,
            index,
        }
    }
}
