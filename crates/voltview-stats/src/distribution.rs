//! Normalized bucket distributions
//!
//! Converts [`BucketCounts`] into the percentage of included samples that
//! fall into each bucket. Excluded samples (negative, NaN, missing) are not
//! part of the population.

use crate::binning::BucketCounts;
use serde::{Deserialize, Serialize};

/// Share of the included samples that fell into one bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
    /// Bucket label, e.g. `"10-20"`
    pub label: String,
    /// Percentage of the included samples, in `[0, 100]`
    pub percentage: f64,
    /// Percentage of all samples, excluded ones included
    pub row_share: f64,
}

/// Percentage of included samples per bucket, in bucket order
///
/// Every bucket appears, including empty ones. When no sample was included
/// all percentages are zero.
pub fn distribution(counts: &BucketCounts) -> Vec<DistributionEntry> {
    let included = counts.included();
    let rows = included + counts.excluded();

    counts
        .iter()
        .map(|(label, count)| DistributionEntry {
            label,
            percentage: percent(count, included),
            row_share: percent(count, rows),
        })
        .collect()
}

fn percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Sum of all percentages; 100 for a non-empty population, 0 otherwise
pub fn total_percentage(entries: &[DistributionEntry]) -> f64 {
    entries.iter().map(|e| e.percentage).sum()
}
