use std::fmt;

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Column – one named numeric series
// ---------------------------------------------------------------------------

/// One named numeric column of the source table (a single series).
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    /// Observations, aligned by row position with every other column.
    pub values: Vec<f64>,
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The parsed source table: a text row-label column plus numeric columns.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// Header of the row-label column (often empty in exported files).
    pub index_name: String,
    /// Row labels (timestamps), kept as text and never correlated.
    pub row_labels: Vec<String>,
    /// Numeric columns in file order.
    pub columns: Vec<Column>,
}

impl Table {
    /// Build a table, checking that every column has one value per row.
    pub fn new(index_name: String, row_labels: Vec<String>, columns: Vec<Column>) -> Option<Self> {
        let rows = row_labels.len();
        if columns.iter().any(|c| c.values.len() != rows) {
            return None;
        }
        Some(Table {
            index_name,
            row_labels,
            columns,
        })
    }

    /// Number of rows (samples).
    pub fn len(&self) -> usize {
        self.row_labels.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_labels.is_empty()
    }

    /// Ordered list of numeric column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Look a column up by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

// ---------------------------------------------------------------------------
// SeriesId – positional identifier token (`MT_000`, `MT_001`, ...)
// ---------------------------------------------------------------------------

/// Identifier prefix shared by series tokens and the column naming convention.
pub const SERIES_PREFIX: &str = "MT_";

/// Positional identifier of a selected column.  `MT_007` is index 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesId(pub usize);

impl SeriesId {
    /// Decode a token into its index.  Only the prefix and an ASCII-digit
    /// suffix are accepted; range checks are the caller's business.
    pub fn parse(token: &str) -> Option<Self> {
        let digits = token.strip_prefix(SERIES_PREFIX)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse::<usize>().ok().map(SeriesId)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SERIES_PREFIX}{:03}", self.0)
    }
}

impl Serialize for SeriesId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
