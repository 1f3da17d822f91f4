use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Startup errors – reading the source table
// ---------------------------------------------------------------------------

/// Anything that stops a meter table from being loaded.  Always fatal at
/// startup: the service never runs with a partially built matrix.
#[derive(Error, Debug)]
pub enum DataFormatError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("table has no header row")]
    MissingHeader,

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("row {row}: expected {expected} fields, found {found}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}, column '{column}': '{value}' is not a number")]
    InvalidNumber {
        row: usize,
        column: String,
        value: String,
    },
}

// ---------------------------------------------------------------------------
// Per-request errors – lookups against the matrix
// ---------------------------------------------------------------------------

/// Recoverable lookup failures; they never touch the shared matrix.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("unknown series '{0}'")]
    UnknownSeries(String),

    #[error("no correlated series found for '{0}'")]
    NoCorrelationFound(String),
}

impl LookupError {
    /// The identifier the caller asked about.
    pub fn meter(&self) -> &str {
        match self {
            LookupError::UnknownSeries(m) | LookupError::NoCorrelationFound(m) => m,
        }
    }

    /// Stable machine-readable code for error payloads.
    pub fn code(&self) -> &'static str {
        match self {
            LookupError::UnknownSeries(_) => "unknown_series",
            LookupError::NoCorrelationFound(_) => "no_correlation_found",
        }
    }
}
