//! Fixed-width text preview of the first rows of a table

use crate::error::Result;
use crate::table::Table;
use crate::types::Value;

/// Number of rows shown when no other count is configured
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

const COLUMN_GAP: &str = "  ";

fn preview_cell(value: &Value) -> String {
    match value {
        Value::Null => "NaN".to_string(),
        // Keep each row on one line
        other => other.as_text().replace(['\n', '\r'], " "),
    }
}

/// Render the first `rows` rows with a header line, every column right-aligned
/// to its widest cell. No row index column is printed.
pub fn render_preview(table: &Table, rows: usize) -> Result<String> {
    let headers = table.column_names();
    let head = table.head(rows);

    if head.is_empty() {
        return Ok(format!("Empty table\nColumns: [{}]", headers.join(", ")));
    }

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(head.num_rows());
    for row in head.rows() {
        cells.push(row?.iter().map(preview_cell).collect());
    }

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            cells
                .iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .fold(header.chars().count(), usize::max)
        })
        .collect();

    let mut lines = Vec::with_capacity(cells.len() + 1);
    lines.push(format_line(&headers, &widths));
    for row in &cells {
        lines.push(format_line(row, &widths));
    }

    Ok(lines.join("\n"))
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{}{}", " ".repeat(pad), cell)
        })
        .collect::<Vec<_>>()
        .join(COLUMN_GAP)
}
