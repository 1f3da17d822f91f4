use std::sync::Arc;

use serde::Serialize;

use crate::data::matrix::CorrelationMatrix;
use crate::data::model::SeriesId;
use crate::error::LookupError;

// ---------------------------------------------------------------------------
// Lookup result
// ---------------------------------------------------------------------------

/// Best-correlated other series for a query, as returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorrelationMatch {
    pub meter: SeriesId,
    pub corr: f64,
}

// ---------------------------------------------------------------------------
// CorrelationLookup – read-only queries against a built matrix
// ---------------------------------------------------------------------------

/// Answers "which other series correlates best with this one?".
///
/// Holds the matrix behind an `Arc`; cloning the service is cheap and every
/// clone reads the same immutable data, so queries can run concurrently.
#[derive(Debug, Clone)]
pub struct CorrelationLookup {
    matrix: Arc<CorrelationMatrix>,
}

impl CorrelationLookup {
    pub fn new(matrix: Arc<CorrelationMatrix>) -> Self {
        Self { matrix }
    }

    /// Number of series the service can answer for.
    pub fn len(&self) -> usize {
        self.matrix.dim()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    /// Resolve `identifier` to an index in `[0, N)`.
    pub fn resolve(&self, identifier: &str) -> Result<SeriesId, LookupError> {
        self.resolve_row(identifier).map(|(id, _)| id)
    }

    /// Decode `identifier` and fetch its matrix row in one range check.
    fn resolve_row(&self, identifier: &str) -> Result<(SeriesId, &[f64]), LookupError> {
        SeriesId::parse(identifier)
            .and_then(|id| self.matrix.row(id.index()).map(|row| (id, row)))
            .ok_or_else(|| LookupError::UnknownSeries(identifier.to_string()))
    }

    /// Find the series with the highest coefficient against `identifier`,
    /// excluding the series itself.
    ///
    /// Scan order is the column order; a candidate must be strictly greater
    /// than the current best, so on a tie the earlier column keeps the lead
    /// and NaN coefficients never win.  When every candidate is NaN (or there
    /// is no other series) the result is [`LookupError::NoCorrelationFound`].
    pub fn find_most_correlated(&self, identifier: &str) -> Result<CorrelationMatch, LookupError> {
        let (id, row) = self.resolve_row(identifier)?;

        let mut best: Option<CorrelationMatch> = None;
        for (i, &c) in row.iter().enumerate() {
            if i == id.index() {
                continue;
            }
            let leads = match best {
                Some(b) => c > b.corr,
                None => c > f64::NEG_INFINITY,
            };
            if leads {
                best = Some(CorrelationMatch {
                    meter: SeriesId(i),
                    corr: c,
                });
            }
        }

        best.ok_or_else(|| LookupError::NoCorrelationFound(identifier.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(cols: &[Vec<f64>]) -> CorrelationLookup {
        let refs: Vec<&[f64]> = cols.iter().map(Vec::as_slice).collect();
        CorrelationLookup::new(Arc::new(CorrelationMatrix::build(&refs)))
    }

    #[test]
    fn picks_highest_other_series() {
        let svc = lookup(&[
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![5.0, 4.0, 3.0, 2.0, 1.0],
            vec![1.0, 2.0, 3.0, 5.0, 4.0],
            vec![2.0, 1.0, 4.0, 3.0, 5.0],
        ]);
        let hit = svc.find_most_correlated("MT_000").unwrap();
        assert_eq!(hit.meter, SeriesId(2));
        assert!((hit.corr - 0.9).abs() < 1e-12);
    }

    #[test]
    fn never_returns_itself() {
        let svc = lookup(&[vec![1.0, 2.0, 3.0], vec![3.0, 2.0, 1.0], vec![1.0, 3.0, 2.0]]);
        for i in 0..svc.len() {
            let id = SeriesId(i).to_string();
            let hit = svc.find_most_correlated(&id).unwrap();
            assert_ne!(hit.meter, SeriesId(i));
        }
    }

    #[test]
    fn tie_goes_to_earliest_column() {
        // Columns 1 and 2 are identical, so both correlate equally with 0.
        let svc = lookup(&[
            vec![1.0, 2.0, 4.0, 3.0],
            vec![2.0, 1.0, 4.0, 3.0],
            vec![2.0, 1.0, 4.0, 3.0],
        ]);
        assert_eq!(svc.find_most_correlated("MT_000").unwrap().meter, SeriesId(1));
    }

    #[test]
    fn negative_best_is_still_a_result() {
        let svc = lookup(&[vec![1.0, 2.0, 3.0], vec![3.0, 2.0, 1.0]]);
        let hit = svc.find_most_correlated("MT_001").unwrap();
        assert_eq!(hit.meter, SeriesId(0));
        assert!((hit.corr + 1.0).abs() < 1e-12);
    }

    #[test]
    fn nan_candidates_are_skipped() {
        let svc = lookup(&[vec![1.0, 2.0, 3.0], vec![7.0, 7.0, 7.0], vec![1.0, 3.0, 2.0]]);
        assert_eq!(svc.find_most_correlated("MT_000").unwrap().meter, SeriesId(2));
    }

    #[test]
    fn all_nan_row_is_no_correlation() {
        let svc = lookup(&[vec![7.0, 7.0, 7.0], vec![1.0, 2.0, 3.0]]);
        assert_eq!(
            svc.find_most_correlated("MT_000"),
            Err(LookupError::NoCorrelationFound("MT_000".into()))
        );
    }

    #[test]
    fn single_series_has_nothing_to_compare() {
        let svc = lookup(&[vec![1.0, 2.0, 3.0]]);
        assert!(matches!(
            svc.find_most_correlated("MT_000"),
            Err(LookupError::NoCorrelationFound(_))
        ));
    }

    #[test]
    fn unknown_identifiers() {
        let svc = lookup(&[vec![1.0, 2.0], vec![2.0, 1.0]]);
        for bad in ["MT_002", "MT_999", "MT_x", "meter", "MT_-01", ""] {
            assert_eq!(
                svc.find_most_correlated(bad),
                Err(LookupError::UnknownSeries(bad.to_string())),
                "{bad:?}"
            );
        }
    }

    #[test]
    fn resolve_checks_range() {
        let svc = lookup(&[vec![1.0, 2.0], vec![2.0, 1.0]]);
        assert_eq!(svc.resolve("MT_001"), Ok(SeriesId(1)));
        assert_eq!(
            svc.resolve("MT_002"),
            Err(LookupError::UnknownSeries("MT_002".into()))
        );
    }

    #[test]
    fn empty_matrix_rejects_everything() {
        let svc = lookup(&[]);
        assert!(svc.is_empty());
        assert!(matches!(
            svc.find_most_correlated("MT_000"),
            Err(LookupError::UnknownSeries(_))
        ));
    }

    #[test]
    fn serializes_as_meter_and_corr() {
        let m = CorrelationMatch {
            meter: SeriesId(1),
            corr: 0.5,
        };
        assert_eq!(
            serde_json::to_value(m).unwrap(),
            serde_json::json!({ "meter": "MT_001", "corr": 0.5 })
        );
    }
}
