//! voltview-stats - Statistical functions for telemetry columns
//!
//! This crate provides the numeric core of voltview:
//!
//! - **Binning**: fixed-width, half-open buckets with an unbounded tail
//! - **Distribution**: percentage of samples per bucket
//! - **Runtime**: elapsed time per bucket for a fixed sampling interval
//! - **Summary**: count, range, mean, median and spread of a column
//!
//! Every function here is pure. Samples arrive as `Option<f64>` so that
//! missing and non-numeric cells can be excluded without a sentinel value.

pub mod binning;
pub mod distribution;
pub mod runtime;
pub mod summary;

pub use binning::*;
pub use distribution::*;
pub use runtime::*;
pub use summary::*;
