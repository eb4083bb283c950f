//! Logging utilities for loadtest populate handlers.

use loadtest_populate_file::PopulateMetrics;

/// Generation runs on a single producer task.
pub const WORKERS: usize = 1;

/// Summary line in the format the bulk loader prints, so existing log
/// filters can aggregate generation runs alongside load runs.
pub fn load_summary(metrics: &PopulateMetrics) -> String {
    format!(
        "loaded {} items and {} values in {:.6}sec with {} workers (mean point rate {:.6} items/sec, mean value rate {:.6}/s)",
        metrics.records_written,
        metrics.values_written,
        metrics.total_duration.as_secs_f64(),
        WORKERS,
        metrics.records_per_second(),
        metrics.values_per_second()
    )
}
