//! Tokenizer settings shared by [`RowReader`](crate::RowReader) and
//! [`RowWriter`](crate::RowWriter).

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SieveError};

/// Delimited-text dialect.
///
/// Deserializes from JSON with every key optional:
///
/// ```
/// use tabsieve::CsvConfig;
///
/// let config = CsvConfig::from_json(r#"{"delimiter": "\t", "null_token": "NULL"}"#)?;
/// assert_eq!(config.delimiter, '\t');
/// assert_eq!(config.quote, '"');
/// assert!(config.has_headers);
/// # Ok::<(), tabsieve::SieveError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CsvConfig {
    /// Field separator.
    pub delimiter: char,
    /// Quote character.
    pub quote: char,
    /// Escape character inside quoted fields. When unset, quotes are
    /// escaped by doubling them.
    pub escape: Option<char>,
    /// Field text that stands for an absent value. Matching fields read as
    /// `None`, and `None` values are written as this token.
    pub null_token: Option<String>,
    /// Strip leading and trailing whitespace from fields and headers.
    pub trim: bool,
    /// Treat the first record as a header row.
    pub has_headers: bool,
    /// Allow records with differing field counts.
    pub flexible: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        CsvConfig {
            delimiter: ',',
            quote: '"',
            escape: None,
            null_token: None,
            trim: false,
            has_headers: true,
            flexible: false,
        }
    }
}

impl CsvConfig {
    /// Creates the default dialect: comma separated, double-quoted, with a
    /// header row.
    pub fn new() -> Self {
        CsvConfig::default()
    }

    /// Parses a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Sets the field separator.
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets the quote character.
    pub fn quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    /// Sets the escape character.
    pub fn escape(mut self, escape: char) -> Self {
        self.escape = Some(escape);
        self
    }

    /// Sets the null token.
    pub fn null_token(mut self, token: impl Into<String>) -> Self {
        self.null_token = Some(token.into());
        self
    }

    /// Enables or disables whitespace trimming.
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Enables or disables the header row.
    pub fn has_headers(mut self, yes: bool) -> Self {
        self.has_headers = yes;
        self
    }

    /// Enables or disables ragged records.
    pub fn flexible(mut self, yes: bool) -> Self {
        self.flexible = yes;
        self
    }

    pub(crate) fn reader_builder(&self) -> Result<csv::ReaderBuilder> {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(ascii("delimiter", self.delimiter)?)
            .quote(ascii("quote", self.quote)?)
            .has_headers(self.has_headers)
            .flexible(self.flexible);
        if let Some(escape) = self.escape {
            builder
                .escape(Some(ascii("escape", escape)?))
                .double_quote(false);
        }
        if self.trim {
            builder.trim(csv::Trim::All);
        }
        Ok(builder)
    }

    pub(crate) fn writer_builder(&self) -> Result<csv::WriterBuilder> {
        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(ascii("delimiter", self.delimiter)?)
            .quote(ascii("quote", self.quote)?)
            .has_headers(self.has_headers)
            .flexible(self.flexible);
        if let Some(escape) = self.escape {
            builder
                .escape(ascii("escape", escape)?)
                .double_quote(false);
        }
        Ok(builder)
    }
}

fn ascii(what: &str, c: char) -> Result<u8> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(SieveError::invalid_argument(format!(
            "{} must be an ASCII character, got {:?}",
            what, c
        )))
    }
}
