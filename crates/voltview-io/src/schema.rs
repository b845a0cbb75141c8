//! Schema, column and table types for telemetry data

use serde::{Deserialize, Serialize};

/// Schema describing the structure of a table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSchema {
    /// Column descriptors, in file order
    pub columns: Vec<ColumnDescriptor>,

    /// Number of records
    pub num_records: usize,
}

impl DataSchema {
    /// Create a new schema
    pub fn new(columns: Vec<ColumnDescriptor>, num_records: usize) -> Self {
        Self {
            columns,
            num_records,
        }
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }
}

/// Descriptor for a column
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name
    pub name: String,

    /// Data type
    pub dtype: ColumnType,
}

impl ColumnDescriptor {
    /// Create a new column descriptor
    pub fn new(name: impl Into<String>, dtype: ColumnType) -> Self {
        Self {
            name: name.into(),
            dtype,
        }
    }
}

/// Column data type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Float64,
    Int64,
    Bool,
    String,
}

impl ColumnType {
    /// Check if this is a numeric type
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Float64 | ColumnType::Int64)
    }

    /// Short name used in listings
    pub fn name(&self) -> &'static str {
        match self {
            ColumnType::Float64 => "float64",
            ColumnType::Int64 => "int64",
            ColumnType::Bool => "bool",
            ColumnType::String => "string",
        }
    }
}

/// A column of data
///
/// Missing float cells are stored as NaN. Missing string cells are empty
/// strings.
#[derive(Debug, Clone, PartialEq)]
pub enum DataColumn {
    Float64(Vec<f64>),
    Int64(Vec<i64>),
    Bool(Vec<bool>),
    String(Vec<String>),
}

impl DataColumn {
    /// Get the column type
    pub fn dtype(&self) -> ColumnType {
        match self {
            DataColumn::Float64(_) => ColumnType::Float64,
            DataColumn::Int64(_) => ColumnType::Int64,
            DataColumn::Bool(_) => ColumnType::Bool,
            DataColumn::String(_) => ColumnType::String,
        }
    }

    /// Get the number of elements
    pub fn len(&self) -> usize {
        match self {
            DataColumn::Float64(v) => v.len(),
            DataColumn::Int64(v) => v.len(),
            DataColumn::Bool(v) => v.len(),
            DataColumn::String(v) => v.len(),
        }
    }

    /// Check if the column is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Coerce every cell to an optional number
    ///
    /// Numeric columns map directly (NaN becomes `None`). String cells are
    /// trimmed and parsed; empty or unparsable cells become `None`. Boolean
    /// columns are not numeric and yield all `None`.
    pub fn to_numeric(&self) -> Vec<Option<f64>> {
        match self {
            DataColumn::Float64(v) => v
                .iter()
                .map(|&x| if x.is_nan() { None } else { Some(x) })
                .collect(),
            DataColumn::Int64(v) => v.iter().map(|&x| Some(x as f64)).collect(),
            DataColumn::Bool(v) => vec![None; v.len()],
            DataColumn::String(v) => v
                .iter()
                .map(|s| {
                    s.trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|x| !x.is_nan())
                })
                .collect(),
        }
    }

    /// Render a single cell for display
    ///
    /// Returns `None` when the row index is out of bounds.
    pub fn cell_display(&self, row: usize) -> Option<String> {
        match self {
            DataColumn::Float64(v) => v
                .get(row)
                .map(|x| if x.is_nan() { String::new() } else { x.to_string() }),
            DataColumn::Int64(v) => v.get(row).map(|x| x.to_string()),
            DataColumn::Bool(v) => v.get(row).map(|x| x.to_string()),
            DataColumn::String(v) => v.get(row).cloned(),
        }
    }
}

/// An ordered, in-memory table of telemetry samples
///
/// Stored column-wise; row `i` is the `i`-th element of every column. Row
/// order is capture order.
#[derive(Debug, Clone)]
pub struct SampleTable {
    schema: DataSchema,
    columns: Vec<DataColumn>,
}

impl SampleTable {
    /// Build a table from a schema and matching columns
    ///
    /// Returns `None` if the column count does not match the schema or the
    /// columns have differing lengths.
    pub fn new(schema: DataSchema, columns: Vec<DataColumn>) -> Option<Self> {
        if schema.num_columns() != columns.len() {
            return None;
        }
        let num_rows = columns.first().map(DataColumn::len).unwrap_or(0);
        if columns.iter().any(|c| c.len() != num_rows) {
            return None;
        }

        let mut schema = schema;
        schema.num_records = num_rows;
        Some(Self { schema, columns })
    }

    /// Build a table from `(name, column)` pairs
    pub fn from_columns<I, S>(columns: I) -> Option<Self>
    where
        I: IntoIterator<Item = (S, DataColumn)>,
        S: Into<String>,
    {
        let (descriptors, data): (Vec<_>, Vec<_>) = columns
            .into_iter()
            .map(|(name, data)| (ColumnDescriptor::new(name, data.dtype()), data))
            .unzip();
        Self::new(DataSchema::new(descriptors, 0), data)
    }

    /// A table with no columns and no rows
    pub fn empty() -> Self {
        Self {
            schema: DataSchema::default(),
            columns: Vec::new(),
        }
    }

    /// Get the schema
    pub fn schema(&self) -> &DataSchema {
        &self.schema
    }

    /// Get a column by name
    pub fn column(&self, name: &str) -> Option<&DataColumn> {
        self.schema
            .column_index(name)
            .and_then(|i| self.columns.get(i))
    }

    /// Get a column by position
    pub fn column_at(&self, index: usize) -> Option<&DataColumn> {
        self.columns.get(index)
    }

    /// Iterate over `(descriptor, column)` pairs in file order
    pub fn iter_columns(&self) -> impl Iterator<Item = (&ColumnDescriptor, &DataColumn)> {
        self.schema.columns.iter().zip(self.columns.iter())
    }

    /// Get column names
    pub fn column_names(&self) -> Vec<&str> {
        self.schema.column_names()
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.schema.num_records
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.num_rows() == 0
    }
}
