//! Excel import (.xlsx, .xls) - first non-empty worksheet, header in row 1

use super::{dedupe_headers, is_missing, parse_number, table_name};
use crate::error::{FinsightError, FinsightResult};
use crate::types::{Column, ColumnValue, Table};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Excel importer reading one worksheet into a table
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    /// Create a new Excel importer
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Import the first worksheet that has any cells
    pub fn import(&self) -> FinsightResult<Table> {
        let mut workbook = open_workbook_auto(&self.path)
            .map_err(|e| FinsightError::Excel(format!("Failed to open Excel file: {}", e)))?;

        let sheet_names = workbook.sheet_names().to_vec();
        for sheet_name in sheet_names {
            let range = workbook
                .worksheet_range(&sheet_name)
                .map_err(|e| FinsightError::Excel(format!("Sheet '{}': {}", sheet_name, e)))?;
            if range.is_empty() {
                continue;
            }
            debug!(sheet = %sheet_name, "reading worksheet");
            return Ok(self.range_to_table(&range));
        }

        // A workbook without data is an empty table, same as a header-less CSV
        Ok(Table::new(table_name(&self.path)))
    }

    fn range_to_table(&self, range: &Range<Data>) -> Table {
        let (height, width) = range.get_size();
        let mut table = Table::new(table_name(&self.path));
        if height == 0 {
            return table;
        }

        let headers: Vec<String> = (0..width)
            .map(|col| match range.get((0, col)) {
                Some(Data::Empty) | None => format!("Unnamed: {}", col),
                Some(cell) => cell.to_string().trim().to_string(),
            })
            .collect();
        let headers = dedupe_headers(headers);

        for (col, name) in headers.into_iter().enumerate() {
            let cells: Vec<Data> = (1..height)
                .map(|row| range.get((row, col)).cloned().unwrap_or(Data::Empty))
                .collect();
            table.add_column(Column::new(name, convert_to_column_value(&cells)));
        }
        table
    }
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) if f.is_finite() => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => parse_number(s),
        _ => None,
    }
}

fn cell_is_missing(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => is_missing(s),
        _ => false,
    }
}

/// Numeric when every non-empty cell holds a number; text otherwise
fn convert_to_column_value(cells: &[Data]) -> ColumnValue {
    let numeric = cells
        .iter()
        .all(|cell| cell_is_missing(cell) || cell_number(cell).is_some());

    if numeric {
        ColumnValue::Number(
            cells
                .iter()
                .map(|cell| if cell_is_missing(cell) { None } else { cell_number(cell) })
                .collect(),
        )
    } else {
        ColumnValue::Text(
            cells
                .iter()
                .map(|cell| match cell {
                    Data::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect(),
        )
    }
}
