//! Series extraction for dual-axis line charts
//!
//! A chart plots one primary column against an x column on the left axis,
//! and optionally a secondary column on the right axis. Only the data is
//! produced here; drawing is left to the renderer.
//!
//! The x column may hold text, such as `12:00:00.045` timestamps. Such a
//! column becomes a categorical axis: points use the row index as x and the
//! cell text is carried alongside as tick labels.

use serde::{Deserialize, Serialize};
use voltview_io::SampleTable;

use crate::analysis::column_values;
use crate::error::{AnalysisError, AnalysisResult};

/// Columns selected for a dual-axis chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualAxisRequest {
    /// Column on the horizontal axis
    pub x: String,
    /// Column on the left vertical axis
    pub y1: String,
    /// Column on the right vertical axis
    pub y2: Option<String>,
}

impl DualAxisRequest {
    /// Request a single-axis chart
    pub fn new(x: impl Into<String>, y1: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y1: y1.into(),
            y2: None,
        }
    }

    /// Add a secondary axis
    pub fn with_secondary(mut self, y2: impl Into<String>) -> Self {
        self.y2 = Some(y2.into());
        self
    }
}

/// One line of a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Column plotted on the vertical axis
    pub column: String,
    /// `(x, y)` points in row order
    pub points: Vec<(f64, f64)>,
}

impl Series {
    fn from_values(column: &str, xs: &[Option<f64>], ys: &[Option<f64>]) -> Self {
        // Rows missing either coordinate are left out of this line only
        let points = xs
            .iter()
            .zip(ys)
            .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
            .collect();

        Self {
            column: column.to_string(),
            points,
        }
    }

}

/// Horizontal axis of a chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum XAxis {
    /// Point x values are the cell values
    Numeric,
    /// Point x values index into `labels`, one label per row
    Categorical { labels: Vec<String> },
}

impl XAxis {
    /// Read the x column, falling back to a categorical axis for text columns
    fn from_column(table: &SampleTable, column: &str) -> AnalysisResult<(Self, Vec<Option<f64>>)> {
        let data = table
            .column(column)
            .ok_or_else(|| AnalysisError::ColumnNotFound {
                column: column.to_string(),
            })?;

        if data.dtype().is_numeric() {
            return Ok((XAxis::Numeric, data.to_numeric()));
        }

        let labels: Vec<String> = (0..data.len())
            .map(|row| data.cell_display(row).unwrap_or_default())
            .collect();
        let xs = (0..labels.len()).map(|row| Some(row as f64)).collect();
        Ok((XAxis::Categorical { labels }, xs))
    }
}

/// Data for a dual-axis line chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualAxisPlot {
    /// Column on the horizontal axis
    pub x: String,
    /// How x values map to the column
    pub x_axis: XAxis,
    /// Line on the left axis
    pub primary: Series,
    /// Line on the right axis
    pub secondary: Option<Series>,
}

/// Extract the series for a dual-axis chart
///
/// Every requested column must exist. The y columns must contain numeric
/// values; the x column may be numeric or text.
pub fn extract_series(table: &SampleTable, request: &DualAxisRequest) -> AnalysisResult<DualAxisPlot> {
    let (x_axis, xs) = XAxis::from_column(table, &request.x)?;
    let primary = Series::from_values(&request.y1, &xs, &column_values(table, &request.y1)?);

    let secondary = match &request.y2 {
        Some(y2) => Some(Series::from_values(y2, &xs, &column_values(table, y2)?)),
        None => None,
    };

    Ok(DualAxisPlot {
        x: request.x.clone(),
        x_axis,
        primary,
        secondary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use voltview_io::DataColumn;

    fn telemetry() -> SampleTable {
        SampleTable::from_columns([
            ("timestamp", DataColumn::Float64(vec![0.0, 0.5, 1.0, 1.5])),
            ("current_in", DataColumn::Float64(vec![5.0, f64::NAN, 15.0, 20.0])),
            ("voltage", DataColumn::Int64(vec![48, 47, 47, 46])),
        ])
        .unwrap()
    }

    #[test]
    fn test_primary_only() {
        let plot = extract_series(&telemetry(), &DualAxisRequest::new("timestamp", "voltage")).unwrap();
        assert_eq!(plot.x, "timestamp");
        assert_eq!(plot.primary.points.len(), 4);
        assert!(plot.secondary.is_none());
        assert_eq!(plot.x_axis, XAxis::Numeric);
        assert_eq!(plot.primary.points[3], (1.5, 46.0));
    }

    #[test]
    fn test_text_x_column_is_categorical() {
        let table = SampleTable::from_columns([
            (
                "time",
                DataColumn::String(vec!["12:00:00.000".to_string(), "12:00:00.045".to_string()]),
            ),
            ("current_in", DataColumn::Int64(vec![5, 15])),
        ])
        .unwrap();

        let plot = extract_series(&table, &DualAxisRequest::new("time", "current_in")).unwrap();
        assert_eq!(
            plot.x_axis,
            XAxis::Categorical {
                labels: vec!["12:00:00.000".to_string(), "12:00:00.045".to_string()]
            }
        );
        assert_eq!(plot.primary.points, vec![(0.0, 5.0), (1.0, 15.0)]);
    }

    #[test]
    fn test_text_y_column_is_rejected() {
        let table = SampleTable::from_columns([
            ("t", DataColumn::Int64(vec![0, 1])),
            ("state", DataColumn::String(vec!["idle".to_string(), "drive".to_string()])),
        ])
        .unwrap();

        let err = extract_series(&table, &DualAxisRequest::new("t", "state")).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::NonNumericColumn {
                column: "state".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_x_column() {
        let err = extract_series(&telemetry(), &DualAxisRequest::new("time", "voltage")).unwrap_err();
        assert!(matches!(err, AnalysisError::ColumnNotFound { .. }));
    }

    #[test]
    fn test_secondary_skips_missing_rows() {
        let request = DualAxisRequest::new("timestamp", "voltage").with_secondary("current_in");
        let plot = extract_series(&telemetry(), &request).unwrap();
        let secondary = plot.secondary.unwrap();

        assert_eq!(secondary.points, vec![(0.0, 5.0), (1.0, 15.0), (1.5, 20.0)]);
        assert_eq!(plot.primary.points.len(), 4);
    }

    #[test]
    fn test_unknown_secondary_column() {
        let request = DualAxisRequest::new("timestamp", "voltage").with_secondary("power");
        let err = extract_series(&telemetry(), &request).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::ColumnNotFound {
                column: "power".to_string()
            }
        );
    }
}
