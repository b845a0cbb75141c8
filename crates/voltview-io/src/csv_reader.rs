//! CSV file reader with type inference

use crate::reader::{DataReader, IoError, IoResult};
use crate::schema::{ColumnDescriptor, ColumnType, DataColumn, DataSchema, SampleTable};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

/// Options controlling how delimited text is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Field delimiter
    pub delimiter: u8,
    /// Whether the first record holds column names
    pub has_header: bool,
}

impl Default for CsvOptions {
    /// Semicolon-separated with a header row, the layout of the logger exports
    fn default() -> Self {
        Self {
            delimiter: b';',
            has_header: true,
        }
    }
}

/// CSV file reader
///
/// The whole file is parsed on open; columns are served from memory.
pub struct CsvReader {
    path: Option<String>,
    table: SampleTable,
    metadata: HashMap<String, String>,
}

impl CsvReader {
    /// Open a CSV file with default options
    pub fn open(path: &str) -> IoResult<Self> {
        Self::open_with_options(path, CsvOptions::default())
    }

    /// Open a CSV file with options
    pub fn open_with_options(path: &str, options: CsvOptions) -> IoResult<Self> {
        if !Path::new(path).exists() {
            return Err(IoError::FileNotFound(path.to_string()));
        }

        let file = File::open(path).map_err(|e| IoError::OpenFailed(e.to_string()))?;
        let mut reader = Self::from_reader(BufReader::new(file), options)?;
        reader.path = Some(path.to_string());

        info!(
            path,
            rows = reader.table.num_rows(),
            columns = reader.table.num_columns(),
            "loaded CSV file"
        );
        Ok(reader)
    }

    /// Parse delimited text from any reader, e.g. uploaded bytes
    pub fn from_reader<R: Read>(input: R, options: CsvOptions) -> IoResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(options.has_header)
            .flexible(true)
            .from_reader(input);

        let headers = if options.has_header {
            Some(
                reader
                    .headers()
                    .map_err(|e| IoError::InvalidFormat(e.to_string()))?
                    .iter()
                    .map(|s| s.to_string())
                    .collect::<Vec<_>>(),
            )
        } else {
            None
        };

        let mut records = Vec::new();
        for result in reader.records() {
            let record = result.map_err(|e| IoError::InvalidFormat(e.to_string()))?;
            records.push(record);
        }

        // Without a header the widest record decides the column count
        let headers = headers.unwrap_or_else(|| {
            let width = records.iter().map(|r| r.len()).max().unwrap_or(0);
            (0..width).map(|i| format!("col_{}", i)).collect()
        });

        let mut descriptors = Vec::with_capacity(headers.len());
        let mut columns = Vec::with_capacity(headers.len());
        for (i, name) in headers.into_iter().enumerate() {
            // Short records are padded with missing cells
            let raw: Vec<String> = records
                .iter()
                .map(|r| r.get(i).unwrap_or("").to_string())
                .collect();
            let dtype = infer_type(&raw);
            debug!(column = %name, dtype = dtype.name(), "inferred column type");
            descriptors.push(ColumnDescriptor::new(name, dtype));
            columns.push(parse_column(&raw, dtype));
        }

        let schema = DataSchema::new(descriptors, records.len());
        let table = SampleTable::new(schema, columns).ok_or_else(|| {
            IoError::InvalidFormat("columns have inconsistent lengths".to_string())
        })?;

        let mut metadata = HashMap::new();
        metadata.insert("format".to_string(), "CSV".to_string());
        metadata.insert(
            "delimiter".to_string(),
            (options.delimiter as char).to_string(),
        );

        Ok(Self {
            path: None,
            table,
            metadata,
        })
    }

    /// Borrow the parsed table
    pub fn table(&self) -> &SampleTable {
        &self.table
    }

    /// Take ownership of the parsed table
    pub fn into_table(self) -> SampleTable {
        self.table
    }
}

impl DataReader for CsvReader {
    fn read_schema(&self) -> IoResult<DataSchema> {
        Ok(self.table.schema().clone())
    }

    fn read_column(&self, name: &str) -> IoResult<DataColumn> {
        self.table
            .column(name)
            .cloned()
            .ok_or_else(|| IoError::ColumnNotFound(name.to_string()))
    }

    fn read_table(&self) -> IoResult<SampleTable> {
        Ok(self.table.clone())
    }

    fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }

    fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    fn format_name(&self) -> &'static str {
        "CSV"
    }
}

/// Infer column type from all of its raw cells
///
/// Integer columns with gaps are promoted to floats so the gaps can be
/// represented as NaN.
fn infer_type(values: &[String]) -> ColumnType {
    let non_empty: Vec<&str> = values
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();
    if non_empty.is_empty() {
        return ColumnType::String;
    }
    let has_missing = non_empty.len() < values.len();

    if !has_missing && non_empty.iter().all(|s| s.parse::<i64>().is_ok()) {
        return ColumnType::Int64;
    }

    if non_empty.iter().all(|s| s.parse::<f64>().is_ok()) {
        return ColumnType::Float64;
    }

    if !has_missing
        && non_empty.iter().all(|s| {
            matches!(
                s.to_lowercase().as_str(),
                "true" | "false" | "yes" | "no"
            )
        })
    {
        return ColumnType::Bool;
    }

    ColumnType::String
}

/// Parse column values into a DataColumn
fn parse_column(values: &[String], dtype: ColumnType) -> DataColumn {
    match dtype {
        ColumnType::Float64 => DataColumn::Float64(
            values
                .iter()
                .map(|s| s.trim().parse().unwrap_or(f64::NAN))
                .collect(),
        ),
        ColumnType::Int64 => {
            DataColumn::Int64(values.iter().map(|s| s.trim().parse().unwrap_or(0)).collect())
        }
        ColumnType::Bool => DataColumn::Bool(
            values
                .iter()
                .map(|s| matches!(s.trim().to_lowercase().as_str(), "true" | "yes"))
                .collect(),
        ),
        ColumnType::String => DataColumn::String(values.to_vec()),
    }
}
