//! voltview-core - Analysis engine for tabular telemetry
//!
//! This crate connects parsed tables to the statistics in `voltview-stats`.
//!
//! # Key Components
//!
//! - **BinningEngine**: distribution and runtime summary of one column
//! - **TableReport**: table shape plus the analysis, or a warning in its place
//! - **ViewerConfig**: sampling interval, bucket layout and CSV options
//! - **DualAxisPlot**: series for a two-axis line chart
//! - **TablePreview**: stringified window of rows for display
//!
//! Every operation takes the table and its parameters explicitly and keeps
//! no state between calls.

pub mod analysis;
pub mod config;
pub mod error;
pub mod plot;
pub mod preview;

pub use analysis::*;
pub use config::*;
pub use error::*;
pub use plot::*;
pub use preview::*;

pub use voltview_io::{CsvOptions, CsvReader, DataReader, SampleTable};
pub use voltview_stats::{
    assign_bucket, BucketSpec, DistributionEntry, RuntimeEntry, SummaryStats,
    DEFAULT_SAMPLE_INTERVAL_SEC,
};
