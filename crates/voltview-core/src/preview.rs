//! Row windows of a table, stringified for display

use voltview_io::SampleTable;

/// A window of rows from a table, stringified for display
#[derive(Debug, Clone, PartialEq)]
pub struct TablePreview {
    /// Column names
    pub headers: Vec<String>,
    /// Rendered cells, one vector per row
    pub rows: Vec<Vec<String>>,
    /// Index of the first rendered row
    pub start: usize,
    /// Number of rows in the full table
    pub total_rows: usize,
}

impl TablePreview {
    /// Render rows `[start, start + limit)` of `table`
    ///
    /// The window is clipped to the table; missing cells render empty.
    pub fn from_table(table: &SampleTable, start: usize, limit: usize) -> Self {
        let total_rows = table.num_rows();
        let end = start.saturating_add(limit).min(total_rows);

        let headers: Vec<String> = table.column_names().iter().map(|s| s.to_string()).collect();
        let rows: Vec<Vec<String>> = (start..end)
            .map(|row| {
                table
                    .iter_columns()
                    .map(|(_, column)| column.cell_display(row).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self {
            headers,
            rows,
            start: start.min(total_rows),
            total_rows,
        }
    }

    /// Whether rows exist beyond the rendered window
    pub fn is_truncated(&self) -> bool {
        self.start + self.rows.len() < self.total_rows
    }
}
