use std::time::Duration;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Resident memory of the current process in megabytes.
///
/// `None` only when the platform does not let the process inspect itself.
pub fn memory_usage_mb() -> Option<f64> {
    memory_stats::memory_stats().map(|stats| stats.physical_mem as f64 / BYTES_PER_MB)
}

/// Memory usage rounded to two decimals, for log lines.  `0.0` when unknown.
pub fn snapshot_mb() -> f64 {
    memory_usage_mb()
        .map(|mb| (mb * 100.0).round() / 100.0)
        .unwrap_or(0.0)
}

/// Human readable duration: `"2 mins 3.250 secs"`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs_f64();
    let mins = (total / 60.0).floor();
    let secs = total - mins * 60.0;
    format!("{} mins {:.3} secs", mins as u64, secs)
}
