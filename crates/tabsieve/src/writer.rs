//! Writing rows and records as delimited text.
//!
//! The writer only decides whether a row is forwarded; serialization is left
//! to the `csv` crate.

use std::borrow::Borrow;
use std::fs::File;
use std::io;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::CsvConfig;
use crate::error::{Result, SieveError};
use crate::header::{Header, NamedRow, Row};
use crate::predicate::{NamedRowPredicate, Predicate, RecordPredicate, RowPredicate};
use crate::schema::Record;
use crate::shape::Shape;

/// Row sink over delimited text.
///
/// Each `write_*` method takes an optional predicate and returns the number
/// of rows it forwarded.
///
/// # Example
///
/// ```
/// use tabsieve::{CsvConfig, RowPredicate, RowWriter};
///
/// let rows = vec![
///     vec![Some("1".to_string()), Some("keep".to_string())],
///     vec![Some("2".to_string()), None],
/// ];
///
/// let config = CsvConfig::new().null_token("NULL");
/// let mut writer = RowWriter::from_writer(Vec::new(), &config)?;
/// let written = writer.write_rows(&rows, Some(&RowPredicate::is_not_null(1)))?;
/// assert_eq!(written, 1);
///
/// let out = String::from_utf8(writer.into_inner()?).unwrap();
/// assert_eq!(out, "1,keep\n");
/// # Ok::<(), tabsieve::SieveError>(())
/// ```
pub struct RowWriter<W: io::Write> {
    inner: csv::Writer<W>,
    null_token: String,
}

impl<W: io::Write> RowWriter<W> {
    /// Wraps a byte sink.
    pub fn from_writer(sink: W, config: &CsvConfig) -> Result<Self> {
        let inner = config.writer_builder()?.from_writer(sink);
        Ok(RowWriter {
            inner,
            null_token: config.null_token.clone().unwrap_or_default(),
        })
    }

    /// Writes a header row.
    pub fn write_header(&mut self, header: &Header) -> Result<()> {
        self.inner.write_record(header.names())?;
        Ok(())
    }

    /// Writes one row. `None` values are written as the null token.
    pub fn write_row(&mut self, row: &[Option<String>]) -> Result<()> {
        let null = self.null_token.as_str();
        self.inner
            .write_record(row.iter().map(|value| value.as_deref().unwrap_or(null)))?;
        Ok(())
    }

    /// Writes the rows the predicate accepts, or every row without one.
    pub fn write_rows<I, R>(&mut self, rows: I, predicate: Option<&RowPredicate>) -> Result<usize>
    where
        I: IntoIterator<Item = R>,
        R: Borrow<Row>,
    {
        let mut written = 0;
        let mut skipped = 0;
        for row in rows {
            let row: &Row = row.borrow();
            if accepts(predicate, row.as_slice())? {
                self.write_row(row)?;
                written += 1;
            } else {
                skipped += 1;
            }
        }
        debug!(written, skipped, "wrote rows");
        Ok(written)
    }

    /// Writes the named rows the predicate accepts, in column order.
    pub fn write_named<I, R>(
        &mut self,
        rows: I,
        predicate: Option<&NamedRowPredicate>,
    ) -> Result<usize>
    where
        I: IntoIterator<Item = R>,
        R: Borrow<NamedRow>,
    {
        let mut written = 0;
        for row in rows {
            let row: &NamedRow = row.borrow();
            if accepts(predicate, row)? {
                self.write_row(row.values())?;
                written += 1;
            }
        }
        debug!(written, "wrote named rows");
        Ok(written)
    }

    /// Serializes the records the predicate accepts.
    ///
    /// With headers enabled, the header row is derived from the first
    /// record written.
    pub fn write_records<T, I, R>(
        &mut self,
        records: I,
        predicate: Option<&RecordPredicate<T>>,
    ) -> Result<usize>
    where
        T: Record + Serialize,
        I: IntoIterator<Item = R>,
        R: Borrow<T>,
    {
        let mut written = 0;
        for record in records {
            let record: &T = record.borrow();
            if accepts(predicate, record)? {
                self.inner.serialize(record)?;
                written += 1;
            } else {
                trace!("record rejected");
            }
        }
        debug!(written, "wrote records");
        Ok(written)
    }

    /// Flushes buffered output.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying sink.
    pub fn into_inner(self) -> Result<W> {
        self.inner
            .into_inner()
            .map_err(|err| SieveError::Io(err.into_error()))
    }
}

impl RowWriter<File> {
    /// Creates or truncates a file.
    pub fn from_path(path: impl AsRef<Path>, config: &CsvConfig) -> Result<Self> {
        let file = File::create(path)?;
        Self::from_writer(file, config)
    }
}

fn accepts<S: Shape>(predicate: Option<&Predicate<S>>, item: &S::Item) -> Result<bool> {
    match predicate {
        Some(predicate) => predicate.accept(item),
        None => Ok(true),
    }
}
