//! Reading delimited text into rows, named rows and records.
//!
//! A [`RowReader`] is a forward-only source. Each `read_*` method pulls the
//! remaining records through a [`Listing`], so rejected rows are dropped as
//! they are read instead of being materialized first.

use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::CsvConfig;
use crate::error::{Result, SieveError};
use crate::header::{Header, NamedRow, Row};
use crate::listing::Listing;
use crate::schema::Record;
use crate::shape::{Named, Positional, Structured};

/// Forward-only reader over delimited text.
///
/// # Example
///
/// ```
/// use tabsieve::{CsvConfig, NamedRowFilter, NamedRowListing, RowReader};
///
/// let data = "name,qty\nbolt,10\nnut,\nwasher,3\n";
/// let mut reader = RowReader::from_reader(data.as_bytes(), &CsvConfig::new())?;
///
/// let listing = NamedRowListing::new()
///     .filter(NamedRowFilter::new().is_not_empty("qty"))
///     .order_asc("name");
/// let rows = reader.read_named(&listing)?;
///
/// let names: Vec<_> = rows.iter().map(|r| r.get("name").unwrap().unwrap()).collect();
/// assert_eq!(names, ["bolt", "washer"]);
/// # Ok::<(), tabsieve::SieveError>(())
/// ```
pub struct RowReader<R> {
    inner: csv::Reader<R>,
    header: Option<Arc<Header>>,
    header_record: Option<csv::StringRecord>,
    null_token: Option<String>,
}

impl<R: io::Read> RowReader<R> {
    /// Wraps a byte source. When the configuration expects a header row it
    /// is read immediately.
    pub fn from_reader(source: R, config: &CsvConfig) -> Result<Self> {
        let mut inner = config.reader_builder()?.from_reader(source);
        let (header, header_record) = if config.has_headers {
            let record = inner.headers()?.clone();
            let header = Header::new(record.iter());
            debug!(columns = header.len(), "read header row");
            (Some(Arc::new(header)), Some(record))
        } else {
            (None, None)
        };
        Ok(RowReader {
            inner,
            header,
            header_record,
            null_token: config.null_token.clone(),
        })
    }

    /// The header row, if the configuration has one.
    pub fn header(&self) -> Option<&Arc<Header>> {
        self.header.as_ref()
    }

    /// Iterates over the remaining rows.
    pub fn rows(&mut self) -> Rows<'_, R> {
        Rows {
            records: self.inner.records(),
            null_token: self.null_token.as_deref(),
        }
    }

    /// Reads the remaining rows through a positional listing.
    pub fn read_rows(&mut self, listing: &Listing<Positional>) -> Result<Vec<Row>> {
        let rows = listing.collect(self.rows())?;
        debug!(rows = rows.len(), "read positional rows");
        Ok(rows)
    }

    /// Reads the remaining rows through a listing addressed by column name.
    ///
    /// Fails with `InvalidState` when the configuration has no header row.
    pub fn read_named(&mut self, listing: &Listing<Named>) -> Result<Vec<NamedRow>> {
        let header = self
            .header
            .clone()
            .ok_or(SieveError::InvalidState("named rows require a header row"))?;
        let named = self
            .rows()
            .map(|row| row.and_then(|values| NamedRow::new(Arc::clone(&header), values)));
        let rows = listing.collect(named)?;
        debug!(rows = rows.len(), "read named rows");
        Ok(rows)
    }

    /// Deserializes the remaining rows into records and reads them through a
    /// record listing.
    ///
    /// Fields equal to the null token are handed to serde as empty strings,
    /// so they map to `None` for `Option` fields.
    pub fn read_records<T>(&mut self, listing: &Listing<Structured<T>>) -> Result<Vec<T>>
    where
        T: Record + DeserializeOwned,
    {
        let header_record = self.header_record.as_ref();
        let null_token = self.null_token.as_deref();
        let records = self.inner.records().map(|record| -> Result<T> {
            let record = record?;
            let record = match null_token {
                Some(token) => record
                    .iter()
                    .map(|field| if field == token { "" } else { field })
                    .collect(),
                None => record,
            };
            Ok(record.deserialize::<T>(header_record)?)
        });
        let out = listing.collect(records)?;
        debug!(records = out.len(), "read records");
        Ok(out)
    }
}

impl RowReader<File> {
    /// Opens a file.
    pub fn from_path(path: impl AsRef<Path>, config: &CsvConfig) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file, config)
    }
}

/// Iterator over the remaining rows of a [`RowReader`].
pub struct Rows<'r, R> {
    records: csv::StringRecordsIter<'r, R>,
    null_token: Option<&'r str>,
}

impl<R: io::Read> Iterator for Rows<'_, R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(err) => return Some(Err(err.into())),
        };
        let row = record
            .iter()
            .map(|field| match self.null_token {
                Some(token) if field == token => None,
                _ => Some(field.to_string()),
            })
            .collect();
        Some(Ok(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::RowPredicate;

    const DATA: &str = "id,name,price\n1,apple,NULL\n2,,1.5\n3,cherry,0.25\n";

    #[test]
    fn header_and_rows() {
        let config = CsvConfig::new().null_token("NULL");
        let mut reader = RowReader::from_reader(DATA.as_bytes(), &config).unwrap();
        assert_eq!(reader.header().unwrap().names(), ["id", "name", "price"]);

        let rows: Vec<Row> = reader.rows().collect::<Result<_>>().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][2], None);
        assert_eq!(rows[1][1].as_deref(), Some(""));
    }

    #[test]
    fn without_null_token_every_field_is_present() {
        let mut reader = RowReader::from_reader(DATA.as_bytes(), &CsvConfig::new()).unwrap();
        let rows: Vec<Row> = reader.rows().collect::<Result<_>>().unwrap();
        assert_eq!(rows[0][2].as_deref(), Some("NULL"));
    }

    #[test]
    fn headerless_input() {
        let config = CsvConfig::new().has_headers(false);
        let mut reader = RowReader::from_reader("a,b\nc,d\n".as_bytes(), &config).unwrap();
        assert!(reader.header().is_none());

        let listing = Listing::new().filter(RowPredicate::eq(0, "c").unwrap());
        let rows = reader.read_rows(&listing).unwrap();
        assert_eq!(rows, vec![vec![Some("c".to_string()), Some("d".to_string())]]);
    }

    #[test]
    fn named_rows_need_a_header() {
        let config = CsvConfig::new().has_headers(false);
        let mut reader = RowReader::from_reader("a,b\n".as_bytes(), &config).unwrap();
        assert!(matches!(
            reader.read_named(&Listing::new()),
            Err(SieveError::InvalidState(_))
        ));
    }

    #[test]
    fn ragged_rows_fail_unless_flexible() {
        let data = "a,b\n1,2\n3\n";
        let mut strict = RowReader::from_reader(data.as_bytes(), &CsvConfig::new()).unwrap();
        assert!(matches!(
            strict.read_rows(&Listing::new()),
            Err(SieveError::Csv(_))
        ));

        let config = CsvConfig::new().flexible(true);
        let mut loose = RowReader::from_reader(data.as_bytes(), &config).unwrap();
        assert_eq!(loose.read_rows(&Listing::new()).unwrap().len(), 2);
    }
}
