//! Runtime summaries
//!
//! Each row of a telemetry log represents one sampling interval. The time
//! spent in a bucket is therefore its row count times the interval.

use crate::binning::BucketCounts;
use serde::{Deserialize, Serialize};

/// Sampling interval of the reference logger, 22 rows per second
pub const DEFAULT_SAMPLE_INTERVAL_SEC: f64 = 1.0 / 22.0;

/// Row count and elapsed time for one bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeEntry {
    /// Bucket label, e.g. `"10-20"`
    pub label: String,
    /// Rows assigned to the bucket
    pub row_count: u64,
    /// `row_count * sample_interval_sec`
    pub total_time_sec: f64,
}

/// Row count and total time per bucket, in bucket order
pub fn runtime_summary(counts: &BucketCounts, sample_interval_sec: f64) -> Vec<RuntimeEntry> {
    counts
        .iter()
        .map(|(label, row_count)| RuntimeEntry {
            label,
            row_count,
            total_time_sec: row_count as f64 * sample_interval_sec,
        })
        .collect()
}

/// Total time covered by the summary
pub fn total_runtime(entries: &[RuntimeEntry]) -> f64 {
    entries.iter().map(|e| e.total_time_sec).sum()
}
