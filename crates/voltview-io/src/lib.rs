//! voltview-io - Tabular telemetry I/O
//!
//! This crate turns exported telemetry files into an in-memory
//! [`SampleTable`]:
//!
//! - **CSV**: delimiter-separated values with per-column type inference
//! - **TSV**: tab-separated variant of the CSV reader
//!
//! # Design
//!
//! All readers implement the `DataReader` trait for uniform access.
//! A telemetry session is small enough to hold in memory, so readers parse
//! the whole file once and serve columns from the parsed table.

pub mod reader;
pub mod schema;

#[cfg(feature = "csv")]
pub mod csv_reader;

pub use reader::*;
pub use schema::*;

#[cfg(feature = "csv")]
pub use csv_reader::{CsvOptions, CsvReader};
