//! Column binning and runtime summaries over a sample table
//!
//! The engine looks up one column, coerces it to numbers and hands the
//! samples to `voltview-stats`. Column lookups fail with
//! [`AnalysisError::ColumnNotFound`] before any output is produced.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use voltview_io::SampleTable;
use voltview_stats::{
    distribution, runtime_summary, total_runtime, BucketCounts, BucketSpec, DistributionEntry,
    RuntimeEntry, SummaryStats, DEFAULT_SAMPLE_INTERVAL_SEC,
};

use crate::config::{AnalysisConfig, ConfigError};
use crate::error::{AnalysisError, AnalysisResult};

/// Numeric samples of a column, in row order
///
/// Fails when the column is absent, or when a non-empty table holds no
/// numeric cell in that column. An empty table yields an empty vector.
pub fn column_values(table: &SampleTable, column: &str) -> AnalysisResult<Vec<Option<f64>>> {
    let data = table
        .column(column)
        .ok_or_else(|| AnalysisError::ColumnNotFound {
            column: column.to_string(),
        })?;

    let values = data.to_numeric();
    if !values.is_empty() && values.iter().all(Option::is_none) {
        return Err(AnalysisError::NonNumericColumn {
            column: column.to_string(),
        });
    }
    Ok(values)
}

/// Summary statistics of a numeric column
pub fn describe_column(table: &SampleTable, column: &str) -> AnalysisResult<SummaryStats> {
    let values = column_values(table, column)?;
    Ok(SummaryStats::from_values(&values))
}

/// Stateless binning engine for one bucket layout and sampling interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinningEngine {
    spec: BucketSpec,
    sample_interval_sec: f64,
}

impl BinningEngine {
    /// Create an engine
    pub fn new(spec: BucketSpec, sample_interval_sec: f64) -> Self {
        Self {
            spec,
            sample_interval_sec,
        }
    }

    /// Create an engine from validated configuration
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, ConfigError> {
        if !config.sample_interval_sec.is_finite() || config.sample_interval_sec <= 0.0 {
            return Err(ConfigError::OutOfRange(format!(
                "sample_interval_sec must be positive, got {}",
                config.sample_interval_sec
            )));
        }
        Ok(Self::new(config.bucket_spec()?, config.sample_interval_sec))
    }

    /// Bucket layout
    pub fn spec(&self) -> &BucketSpec {
        &self.spec
    }

    /// Seconds represented by one row
    pub fn sample_interval_sec(&self) -> f64 {
        self.sample_interval_sec
    }

    /// Count the rows of `column` per bucket
    pub fn bucket_counts(&self, table: &SampleTable, column: &str) -> AnalysisResult<BucketCounts> {
        let values = column_values(table, column)?;
        let counts = BucketCounts::from_values(self.spec, values);
        debug!(
            column,
            included = counts.included(),
            excluded = counts.excluded(),
            "bucketed column"
        );
        Ok(counts)
    }

    /// Percentage of included rows per bucket
    pub fn compute_distribution(
        &self,
        table: &SampleTable,
        column: &str,
    ) -> AnalysisResult<Vec<DistributionEntry>> {
        Ok(distribution(&self.bucket_counts(table, column)?))
    }

    /// Row count and elapsed time per bucket
    pub fn compute_runtime_summary(
        &self,
        table: &SampleTable,
        column: &str,
    ) -> AnalysisResult<Vec<RuntimeEntry>> {
        let counts = self.bucket_counts(table, column)?;
        Ok(runtime_summary(&counts, self.sample_interval_sec))
    }

    /// Distribution and runtime summary from a single pass over the column
    pub fn analyze(&self, table: &SampleTable, column: &str) -> AnalysisResult<ColumnReport> {
        let counts = self.bucket_counts(table, column)?;
        let runtime = runtime_summary(&counts, self.sample_interval_sec);

        Ok(ColumnReport {
            column: column.to_string(),
            included_rows: counts.included(),
            excluded_rows: counts.excluded(),
            sample_interval_sec: self.sample_interval_sec,
            total_time_sec: total_runtime(&runtime),
            distribution: distribution(&counts),
            runtime,
        })
    }

    /// Table-level report on `column`
    ///
    /// A missing or non-numeric target column does not fail the report: the
    /// error text is kept as a warning and the analysis is left out.
    pub fn report(&self, table: &SampleTable, column: &str) -> AnalysisResult<TableReport> {
        let (warning, analysis) = match self.analyze(table, column) {
            Ok(report) => (None, Some(report)),
            Err(err) if err.is_warning() => {
                warn!(%err, "skipping distribution and runtime summary");
                (Some(err.to_string()), None)
            }
            Err(err) => return Err(err),
        };

        Ok(TableReport {
            rows: table.num_rows(),
            columns: table.column_names().iter().map(|s| s.to_string()).collect(),
            column: column.to_string(),
            warning,
            analysis,
        })
    }
}

impl Default for BinningEngine {
    fn default() -> Self {
        Self::new(BucketSpec::default(), DEFAULT_SAMPLE_INTERVAL_SEC)
    }
}

/// Distribution and runtime summary of one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnReport {
    pub column: String,
    pub included_rows: u64,
    pub excluded_rows: u64,
    pub sample_interval_sec: f64,
    pub total_time_sec: f64,
    pub distribution: Vec<DistributionEntry>,
    pub runtime: Vec<RuntimeEntry>,
}

/// Table shape plus the analysis of one column, if it could be analysed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableReport {
    pub rows: usize,
    pub columns: Vec<String>,
    /// Target column
    pub column: String,
    /// Reason the analysis is absent
    pub warning: Option<String>,
    pub analysis: Option<ColumnReport>,
}

/// Distribution of `column` over the default 10-unit buckets
pub fn compute_distribution(
    table: &SampleTable,
    column: &str,
) -> AnalysisResult<Vec<DistributionEntry>> {
    BinningEngine::default().compute_distribution(table, column)
}

/// Runtime summary of `column` over the default 10-unit buckets
pub fn compute_runtime_summary(
    table: &SampleTable,
    column: &str,
    sample_interval_sec: f64,
) -> AnalysisResult<Vec<RuntimeEntry>> {
    BinningEngine::new(BucketSpec::default(), sample_interval_sec)
        .compute_runtime_summary(table, column)
}
