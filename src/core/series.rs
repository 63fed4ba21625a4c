//! Chart-ready series for numeric columns

use crate::types::{Column, Table};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSeries {
    pub column: String,
    /// One label per row
    pub labels: Vec<String>,
    pub values: Vec<Option<f64>>,
}

/// First column that looks like a date or period axis
pub fn label_column(table: &Table) -> Option<&Column> {
    table.columns.iter().find(|c| {
        let lower = c.name.to_lowercase();
        lower.contains("date") || lower.contains("period")
    })
}

/// Row labels: the date/period column rendered as text, else `Period 1..N`
pub fn row_labels(table: &Table) -> Vec<String> {
    match label_column(table) {
        Some(column) => (0..table.row_count())
            .map(|row| column.values.cell_text(row))
            .collect(),
        None => (1..=table.row_count())
            .map(|n| format!("Period {n}"))
            .collect(),
    }
}

/// Series for one numeric column; `None` if it is missing or text
pub fn extract_series(table: &Table, column: &str) -> Option<ColumnSeries> {
    let values = table.column(column)?.values.as_numbers()?;
    Some(ColumnSeries {
        column: column.to_string(),
        labels: row_labels(table),
        values: values.to_vec(),
    })
}
