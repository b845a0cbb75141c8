//! Terminal tables

use comfy_table::{presets::ASCII_FULL_CONDENSED, CellAlignment, Table};
use voltview_core::TablePreview;

/// Table with the shared look and the given header
///
/// Columns listed in `numeric` are right-aligned.
pub fn styled_table<I, T>(header: I, numeric: &[usize]) -> Table
where
    I: IntoIterator<Item = T>,
    T: Into<comfy_table::Cell>,
{
    let mut table = Table::new();
    table.load_preset(ASCII_FULL_CONDENSED);
    table.set_header(header);

    for &index in numeric {
        if let Some(column) = table.column_mut(index) {
            column.set_cell_alignment(CellAlignment::Right);
        }
    }
    table
}

/// Table holding a preview window, one column per table column
pub fn preview_table(preview: &TablePreview) -> Table {
    let mut table = styled_table(&preview.headers, &[]);
    for row in &preview.rows {
        table.add_row(row);
    }
    table
}

/// Line describing which rows a preview shows
pub fn preview_footer(preview: &TablePreview) -> String {
    let mut footer = format!(
        "({} of {} rows, starting at {})",
        preview.rows.len(),
        preview.total_rows,
        preview.start
    );
    if preview.is_truncated() {
        footer.push_str("; use --start to page");
    }
    footer
}

#[cfg(test)]
mod tests {
    use super::*;

    fn preview(rows: usize, total_rows: usize) -> TablePreview {
        TablePreview {
            headers: vec!["t".to_string(), "current_in".to_string()],
            rows: (0..rows).map(|i| vec![i.to_string(), "5".to_string()]).collect(),
            start: 0,
            total_rows,
        }
    }

    #[test]
    fn test_preview_table() {
        let rendered = preview_table(&preview(1, 1)).to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[1], "| t | current_in |");
        assert_eq!(lines[3], "| 0 | 5          |");
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn test_preview_footer() {
        assert_eq!(preview_footer(&preview(2, 2)), "(2 of 2 rows, starting at 0)");
        assert_eq!(
            preview_footer(&preview(2, 5)),
            "(2 of 5 rows, starting at 0); use --start to page"
        );
    }
}
