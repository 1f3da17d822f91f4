use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use super::model::{Column, Table};
use crate::error::DataFormatError;

// ---------------------------------------------------------------------------
// Parsing configuration
// ---------------------------------------------------------------------------

/// Delimiter and decimal convention of the source file.
///
/// The defaults match the regional export format of the meter dataset:
/// `;` between fields and `,` as decimal point (`"2011-01-01 00:15:00";2,5;0`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub decimal: char,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            decimal: ',',
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a meter table from a delimited text file with a header row.
///
/// The first column holds row labels (timestamps) and is kept as text;
/// every other column must be numeric under `opts.decimal`.
pub fn load_table(path: &Path, opts: &LoadOptions) -> Result<Table, DataFormatError> {
    let file = File::open(path).map_err(|source| DataFormatError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_table(file, opts)
}

/// Same as [`load_table`] but from any reader.
pub fn read_table<R: Read>(source: R, opts: &LoadOptions) -> Result<Table, DataFormatError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(opts.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let Some((index_name, series_names)) = headers.split_first() else {
        return Err(DataFormatError::MissingHeader);
    };

    let mut seen = HashSet::with_capacity(series_names.len());
    for name in series_names {
        if !seen.insert(name.as_str()) {
            return Err(DataFormatError::DuplicateColumn(name.clone()));
        }
    }

    let mut row_labels = Vec::new();
    let mut columns: Vec<Vec<f64>> = vec![Vec::new(); series_names.len()];

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() != headers.len() {
            return Err(DataFormatError::RaggedRow {
                row: row_no,
                expected: headers.len(),
                found: record.len(),
            });
        }

        row_labels.push(record.get(0).unwrap_or_default().to_string());
        for (col_idx, raw) in record.iter().skip(1).enumerate() {
            let value =
                parse_number(raw, opts.decimal).ok_or_else(|| DataFormatError::InvalidNumber {
                    row: row_no,
                    column: series_names[col_idx].clone(),
                    value: raw.to_string(),
                })?;
            columns[col_idx].push(value);
        }
    }

    debug!(
        "parsed {} rows x {} numeric columns",
        row_labels.len(),
        series_names.len()
    );

    let columns = series_names
        .iter()
        .zip(columns)
        .map(|(name, values)| Column {
            name: name.clone(),
            values,
        })
        .collect();

    // Every record matched the header width, so all columns are row_labels.len() long.
    Ok(Table {
        index_name: index_name.clone(),
        row_labels,
        columns,
    })
}

/// Parse one field.  Empty fields are missing observations (NaN).
fn parse_number(raw: &str, decimal: char) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return Some(f64::NAN);
    }
    if decimal == '.' {
        return s.parse().ok();
    }
    // With a non-dot decimal mark a literal '.' is ambiguous (grouping?), reject it.
    if s.contains('.') {
        return None;
    }
    s.replace(decimal, ".").parse().ok()
}
