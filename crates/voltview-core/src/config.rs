//! Configuration for voltview
//!
//! Centralized configuration for input parsing and column analysis. Loaded
//! from TOML; every field has a default so partial files are accepted.
//!
//! ```toml
//! [input]
//! delimiter = ";"
//! has_header = true
//!
//! [analysis]
//! target_column = "current_in"
//! sample_interval_sec = 0.045454545454545456
//! bucket_width = 10.0
//! bounded_buckets = 13
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use voltview_io::CsvOptions;
use voltview_stats::{BucketSpec, DEFAULT_SAMPLE_INTERVAL_SEC};

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error("Invalid delimiter {0:?}: expected a single ASCII character")]
    InvalidDelimiter(String),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// How input files are parsed
    pub input: InputConfig,
    /// Column analysis parameters
    pub analysis: AnalysisConfig,
}

/// Input parsing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Field delimiter, a single ASCII character (`"\t"` for tabs)
    pub delimiter: String,
    /// Whether the first record holds column names
    pub has_header: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: ";".to_string(),
            has_header: true,
        }
    }
}

impl InputConfig {
    /// Delimiter as a byte for the CSV parser
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        parse_delimiter(&self.delimiter)
    }

    /// Parser options for this configuration
    pub fn csv_options(&self) -> Result<CsvOptions, ConfigError> {
        Ok(CsvOptions {
            delimiter: self.delimiter_byte()?,
            has_header: self.has_header,
        })
    }
}

/// Column analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Column analysed when none is given explicitly
    pub target_column: String,
    /// Seconds represented by one row
    pub sample_interval_sec: f64,
    /// Width of each bounded bucket
    pub bucket_width: f64,
    /// Number of bounded buckets before the open-ended tail
    pub bounded_buckets: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target_column: "current_in".to_string(),
            sample_interval_sec: DEFAULT_SAMPLE_INTERVAL_SEC,
            bucket_width: BucketSpec::DEFAULT_WIDTH,
            bounded_buckets: BucketSpec::DEFAULT_BOUNDED,
        }
    }
}

impl AnalysisConfig {
    /// Bucket layout for this configuration
    pub fn bucket_spec(&self) -> Result<BucketSpec, ConfigError> {
        BucketSpec::new(self.bucket_width, self.bounded_buckets)
            .map_err(|e| ConfigError::OutOfRange(e.to_string()))
    }
}

impl ViewerConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents)?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load the per-user configuration, falling back to defaults when absent
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                debug!("no configuration file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Default configuration path, `<config_dir>/voltview/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("voltview").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let interval = self.analysis.sample_interval_sec;
        if !interval.is_finite() || interval <= 0.0 {
            return Err(ConfigError::OutOfRange(format!(
                "sample_interval_sec must be positive, got {}",
                interval
            )));
        }

        self.analysis.bucket_spec()?;

        if self.analysis.target_column.is_empty() {
            return Err(ConfigError::OutOfRange(
                "target_column must not be empty".to_string(),
            ));
        }

        self.input.delimiter_byte()?;
        Ok(())
    }
}

/// Parse a delimiter given on the command line or in a config file
///
/// Accepts a single ASCII character, or the escapes `\t` and `tab`.
pub fn parse_delimiter(value: &str) -> Result<u8, ConfigError> {
    match value {
        "\\t" | "tab" => return Ok(b'\t'),
        _ => {}
    }

    let mut bytes = value.bytes();
    match (bytes.next(), bytes.next()) {
        (Some(byte), None) if byte.is_ascii() => Ok(byte),
        _ => Err(ConfigError::InvalidDelimiter(value.to_string())),
    }
}
