use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use log::{info, warn};

use crate::data::filter::{series_columns, series_data};
use crate::data::loader::{load_table, LoadOptions};
use crate::data::matrix::CorrelationMatrix;
use crate::data::model::Table;
use crate::error::DataFormatError;
use crate::lookup::CorrelationLookup;
use crate::telemetry::{format_elapsed, snapshot_mb};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Everything the request handlers need, built once before serving.
///
/// Nothing in here is mutated after construction; handlers share it through
/// an `Arc` and only read.
pub struct AppState {
    /// Lookup service over the precomputed matrix.
    pub lookup: CorrelationLookup,

    /// Selected series names, in index order (`MT_000` is the first).
    pub series: Vec<String>,

    /// Number of samples each series contributed.
    pub samples: usize,
}

impl AppState {
    /// Select the series of an already loaded table and build the matrix.
    pub fn from_table(table: &Table, prefix: &str) -> Self {
        let series: Vec<String> = series_columns(table, prefix)
            .into_iter()
            .map(str::to_string)
            .collect();
        if series.is_empty() {
            warn!("no columns start with '{prefix}', every lookup will be unknown");
        }

        let started = Instant::now();
        let matrix = CorrelationMatrix::build(&series_data(table, prefix));
        info!(
            "built {n}x{n} correlation matrix over {} samples in {}",
            table.len(),
            format_elapsed(started.elapsed()),
            n = matrix.dim()
        );

        AppState {
            lookup: CorrelationLookup::new(Arc::new(matrix)),
            series,
            samples: table.len(),
        }
    }

    /// Full startup sequence: load → select → build.  Blocking.
    pub fn load(path: &Path, opts: &LoadOptions, prefix: &str) -> Result<Self, DataFormatError> {
        info!("mem_before_data_load: {} MB", snapshot_mb());
        info!("loading meter data from {}", path.display());
        let started = Instant::now();
        let table = load_table(path, opts)?;
        info!(
            "loaded {} rows x {} columns in {}",
            table.len(),
            table.columns.len(),
            format_elapsed(started.elapsed())
        );
        info!("mem_after_data_load: {} MB", snapshot_mb());

        Ok(Self::from_table(&table, prefix))
    }

    /// Run [`AppState::load`] on the blocking pool, bounded by `limit`.
    ///
    /// Expiry is an error; the blocking task itself cannot be cancelled and
    /// keeps running until it finishes on its own.
    pub async fn load_with_timeout(
        path: PathBuf,
        opts: LoadOptions,
        prefix: String,
        limit: Option<Duration>,
    ) -> anyhow::Result<Self> {
        let source = path.clone();
        let build = tokio::task::spawn_blocking(move || Self::load(&path, &opts, &prefix));

        let joined = match limit {
            Some(limit) => tokio::time::timeout(limit, build)
                .await
                .map_err(|_| anyhow!("startup did not finish within {limit:?}"))?,
            None => build.await,
        };

        let state = joined
            .context("startup task panicked")?
            .with_context(|| format!("loading {}", source.display()))?;
        Ok(state)
    }
}
