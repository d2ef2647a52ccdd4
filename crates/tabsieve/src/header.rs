//! Header rows and rows addressed by column name.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Result, SieveError};

/// A row of raw values. `None` stands for the configured null token.
pub type Row = Vec<Option<String>>;

/// Column names of a delimited file, with a name→index map built once.
///
/// When a name appears more than once, lookups resolve to its first
/// occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl Header {
    /// Creates a header from column names.
    pub fn new<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut index = HashMap::with_capacity(names.len());
        for (pos, name) in names.iter().enumerate() {
            index.entry(name.clone()).or_insert(pos);
        }
        Header { names, index }
    }

    /// Returns the position of a column.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Returns the column names in file order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the header has no columns.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A row paired with the header it was read under.
///
/// The header is shared, so building a `NamedRow` per record only costs a
/// reference count increment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRow {
    header: Arc<Header>,
    values: Row,
}

impl NamedRow {
    /// Pairs values with a header.
    ///
    /// Fails with `InvalidArgument` if the row and header lengths differ.
    pub fn new(header: Arc<Header>, values: Row) -> Result<Self> {
        if header.len() != values.len() {
            return Err(SieveError::invalid_argument(format!(
                "row has {} values but header has {} columns",
                values.len(),
                header.len()
            )));
        }
        Ok(NamedRow { header, values })
    }

    /// Returns the value of a named column.
    pub fn get(&self, name: &str) -> Result<Option<&str>> {
        let index = self
            .header
            .position(name)
            .ok_or_else(|| SieveError::UnknownColumn {
                name: name.to_string(),
            })?;
        Ok(self.values[index].as_deref())
    }

    /// Returns the shared header.
    pub fn header(&self) -> &Arc<Header> {
        &self.header
    }

    /// Returns the raw values in column order.
    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    /// Consumes the row, returning its values.
    pub fn into_values(self) -> Row {
        self.values
    }
}
