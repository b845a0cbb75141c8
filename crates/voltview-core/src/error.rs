//! Error types for voltview-core
//!
//! Analysis errors are recoverable: the caller reports them and skips the
//! affected section. Everything else is wrapped in [`ViewerError`].

use thiserror::Error;
use voltview_io::IoError;
use voltview_stats::BinningError;

use crate::config::ConfigError;

/// Main error type for voltview operations
#[derive(Error, Debug)]
pub enum ViewerError {
    /// Table loading errors
    #[error("Failed to load table: {0}")]
    Load(#[from] IoError),

    /// Column analysis errors
    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Output serialization errors
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while analysing a single column
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The requested column is not part of the table
    #[error("Column '{column}' not found in table")]
    ColumnNotFound { column: String },

    /// The column exists but none of its cells is a number
    #[error("Column '{column}' contains no numeric values")]
    NonNumericColumn { column: String },

    /// The bucket layout is unusable
    #[error("Invalid bucket layout: {0}")]
    Binning(#[from] BinningError),
}

impl AnalysisError {
    /// Whether the error should be shown as a warning and the section skipped
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            AnalysisError::ColumnNotFound { .. } | AnalysisError::NonNumericColumn { .. }
        )
    }
}

/// Result type for column analysis
pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = AnalysisError::ColumnNotFound {
            column: "current_in".to_string(),
        };
        assert_eq!(err.to_string(), "Column 'current_in' not found in table");
        assert!(err.is_warning());

        let err = AnalysisError::from(BinningError::NoBoundedBuckets);
        assert!(!err.is_warning());
    }

    #[test]
    fn test_viewer_error_wraps_analysis() {
        let err: ViewerError = AnalysisError::NonNumericColumn {
            column: "state".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Analysis failed: Column 'state' contains no numeric values"
        );
    }
}
