use super::model::Table;

// ---------------------------------------------------------------------------
// Column selection: which columns are correlatable series
// ---------------------------------------------------------------------------

/// Names of the columns whose header starts with `prefix`, in file order.
///
/// The returned order is the index mapping used by the correlation matrix and
/// by identifier decoding: position `i` here is series `MT_{i:03}`.
pub fn series_columns<'a>(table: &'a Table, prefix: &str) -> Vec<&'a str> {
    table
        .columns
        .iter()
        .filter(|c| c.name.starts_with(prefix))
        .map(|c| c.name.as_str())
        .collect()
}

/// The selected columns themselves, same order as [`series_columns`].
pub fn series_data<'a>(table: &'a Table, prefix: &str) -> Vec<&'a [f64]> {
    table
        .columns
        .iter()
        .filter(|c| c.name.starts_with(prefix))
        .map(|c| c.values.as_slice())
        .collect()
}
