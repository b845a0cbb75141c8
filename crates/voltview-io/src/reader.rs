//! Data reader trait and common types
//!
//! The `DataReader` trait provides a uniform interface for reading
//! telemetry tables from the supported file formats.

use crate::schema::{DataColumn, DataSchema, SampleTable};
use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur during I/O operations
#[derive(Debug, Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to open file: {0}")]
    OpenFailed(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Column not found: {0}")]
    ColumnNotFound(String),
}

/// Result type for I/O operations
pub type IoResult<T> = Result<T, IoError>;

/// Trait for reading telemetry tables from various formats
pub trait DataReader: Send + Sync {
    /// Read the schema (column names, types, record count)
    fn read_schema(&self) -> IoResult<DataSchema>;

    /// Read a single column by name
    fn read_column(&self, name: &str) -> IoResult<DataColumn>;

    /// Read the whole table
    fn read_table(&self) -> IoResult<SampleTable>;

    /// Get metadata as key-value pairs
    fn metadata(&self) -> &HashMap<String, String>;

    /// Get the file path (if applicable)
    fn path(&self) -> Option<&str> {
        None
    }

    /// Get the format name
    fn format_name(&self) -> &'static str;
}

/// A boxed reader for dynamic dispatch
pub type BoxedReader = Box<dyn DataReader>;

/// Open a file and return an appropriate reader
///
/// The format is auto-detected from the file extension. `delimiter` applies
/// to `.csv` and `.txt` files; `.tsv` files are always tab-separated.
pub fn open_file(path: &str, delimiter: u8, has_header: bool) -> IoResult<BoxedReader> {
    let extension = path
        .rsplit('.')
        .next()
        .map(|s| s.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        #[cfg(feature = "csv")]
        "csv" | "txt" => {
            use crate::csv_reader::{CsvOptions, CsvReader};
            let options = CsvOptions {
                delimiter,
                has_header,
            };
            Ok(Box::new(CsvReader::open_with_options(path, options)?))
        }

        #[cfg(feature = "csv")]
        "tsv" => {
            use crate::csv_reader::{CsvOptions, CsvReader};
            let options = CsvOptions {
                delimiter: b'\t',
                has_header,
            };
            Ok(Box::new(CsvReader::open_with_options(path, options)?))
        }

        _ => Err(IoError::InvalidFormat(format!(
            "Unknown file extension: {} (supported: {})",
            extension,
            supported_extensions().join(", ")
        ))),
    }
}

/// List supported file extensions
pub fn supported_extensions() -> Vec<&'static str> {
    let mut extensions = Vec::new();

    #[cfg(feature = "csv")]
    {
        extensions.push("csv");
        extensions.push("txt");
        extensions.push("tsv");
    }

    extensions
}
