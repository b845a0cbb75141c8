//! Summary statistics for a telemetry column
//!
//! Provides the figures shown next to each column when a table is inspected:
//! - Count of usable values and count of missing cells
//! - Min, max, range
//! - Mean, standard deviation, median

use serde::{Deserialize, Serialize};

/// Summary statistics for a numeric column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of finite values
    pub count: usize,
    /// Number of missing, NaN or infinite values
    pub missing: usize,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Mean (average)
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Median (50th percentile)
    pub median: f64,
}

impl SummaryStats {
    /// Compute summary statistics from optional samples
    pub fn from_values(data: &[Option<f64>]) -> Self {
        let mut finite: Vec<f64> = data
            .iter()
            .flatten()
            .copied()
            .filter(|x| x.is_finite())
            .collect();
        let missing = data.len() - finite.len();

        if finite.is_empty() {
            return Self::empty(missing);
        }

        let count = finite.len();
        let mean = finite.iter().sum::<f64>() / count as f64;
        let variance = finite.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / count as f64;

        finite.sort_by(f64::total_cmp);
        let median = if count % 2 == 0 {
            (finite[count / 2 - 1] + finite[count / 2]) / 2.0
        } else {
            finite[count / 2]
        };

        Self {
            count,
            missing,
            min: finite[0],
            max: finite[count - 1],
            mean,
            std_dev: variance.sqrt(),
            median,
        }
    }

    /// Create empty statistics (all NaN)
    fn empty(missing: usize) -> Self {
        Self {
            count: 0,
            missing,
            min: f64::NAN,
            max: f64::NAN,
            mean: f64::NAN,
            std_dev: f64::NAN,
            median: f64::NAN,
        }
    }

    /// Check whether any value was usable
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Get the range (max - min)
    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}
