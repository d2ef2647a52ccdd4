//! Error types for the tabsieve crate.

use thiserror::Error;

/// Error returned by a fallible record accessor.
pub type AccessError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur when building or evaluating predicates, or while
/// streaming rows through a reader or writer.
#[derive(Debug, Error)]
pub enum SieveError {
    /// Malformed predicate construction: a null operand, an empty pattern,
    /// a null candidate, or a builder wrapped around a non-combinator.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Regular expression that does not compile.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// Column name not present in the row header.
    #[error("unknown column '{name}'")]
    UnknownColumn { name: String },

    /// Field name not registered for the record type.
    #[error("unknown field '{field}' on {record}")]
    UnknownField { record: &'static str, field: String },

    /// The field resolved, but reading it failed.
    #[error("cannot access field '{field}' on {record}: {source}")]
    FieldAccess {
        record: &'static str,
        field: String,
        #[source]
        source: AccessError,
    },

    /// Positional index outside `[0, len)`.
    #[error("column index {index} out of range for row of {len} values")]
    InvalidIndex { index: usize, len: usize },

    /// A combinator evaluated with no children.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// Two values that have no defined order between them.
    #[error("cannot compare {left} with {right}")]
    Incomparable {
        left: &'static str,
        right: &'static str,
    },

    /// Tokenizer or row writer failure.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration that is not valid JSON or does not match [`CsvConfig`](crate::CsvConfig).
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// Underlying I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SieveError {
    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        SieveError::InvalidArgument(msg.into())
    }
}

/// Result type for tabsieve operations.
pub type Result<T> = std::result::Result<T, SieveError>;
