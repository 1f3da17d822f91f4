use rayon::prelude::*;

// ---------------------------------------------------------------------------
// CorrelationMatrix – immutable N×N Pearson coefficients
// ---------------------------------------------------------------------------

/// Square, symmetric matrix of Pearson coefficients, stored row-major.
///
/// Built once from the selected series and never mutated afterwards.
/// Coefficients involving a constant series (or a series with a missing
/// observation) are NaN; the builder does not try to interpret them.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    dim: usize,
    cells: Vec<f64>,
}

impl CorrelationMatrix {
    /// Compute the pairwise correlation of `series`, each slice being one
    /// variable and each position one sample.  All slices must share a length.
    ///
    /// Cost is O(N²·T); rows of the upper triangle are spread over the rayon
    /// pool and mirrored, so `get(i, j)` and `get(j, i)` are the same value.
    pub fn build(series: &[&[f64]]) -> Self {
        let dim = series.len();
        let centered: Vec<Centered> = series.par_iter().map(|s| Centered::new(s)).collect();

        let upper: Vec<Vec<f64>> = (0..dim)
            .into_par_iter()
            .map(|i| {
                (i..dim)
                    .map(|j| {
                        if i == j {
                            centered[i].self_coefficient()
                        } else {
                            centered[i].pearson(&centered[j])
                        }
                    })
                    .collect()
            })
            .collect();

        let mut cells = vec![f64::NAN; dim * dim];
        for (i, row) in upper.into_iter().enumerate() {
            for (offset, r) in row.into_iter().enumerate() {
                let j = i + offset;
                cells[i * dim + j] = r;
                cells[j * dim + i] = r;
            }
        }

        CorrelationMatrix { dim, cells }
    }

    /// Number of series (rows == columns).
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.dim == 0
    }

    /// Coefficient between series `i` and `j`, `None` when out of range.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        (i < self.dim && j < self.dim).then(|| self.cells[i * self.dim + j])
    }

    /// All coefficients of series `i` against every series (itself included).
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        (i < self.dim).then(|| &self.cells[i * self.dim..(i + 1) * self.dim])
    }
}

// ---------------------------------------------------------------------------
// Centered series – deviations from the mean plus their Euclidean norm
// ---------------------------------------------------------------------------

struct Centered {
    deviations: Vec<f64>,
    norm: f64,
}

impl Centered {
    fn new(values: &[f64]) -> Self {
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let deviations: Vec<f64> = values.iter().map(|v| v - mean).collect();
        let norm = deviations.iter().map(|d| d * d).sum::<f64>().sqrt();
        Centered { deviations, norm }
    }

    fn has_variance(&self) -> bool {
        self.norm.is_finite() && self.norm > 0.0
    }

    fn self_coefficient(&self) -> f64 {
        if self.has_variance() {
            1.0
        } else {
            f64::NAN
        }
    }

    fn pearson(&self, other: &Centered) -> f64 {
        if !self.has_variance() || !other.has_variance() {
            return f64::NAN;
        }
        let covariance: f64 = self
            .deviations
            .iter()
            .zip(&other.deviations)
            .map(|(a, b)| a * b)
            .sum();
        (covariance / (self.norm * other.norm)).clamp(-1.0, 1.0)
    }
}
