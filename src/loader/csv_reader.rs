//! Delimited text import (.csv)

use super::{dedupe_headers, infer_column, table_name};
use crate::error::FinsightResult;
use crate::types::Table;
use csv::{ReaderBuilder, Trim};
use std::io::Read;
use std::path::Path;

/// Read a CSV file with a header row into a table named after the file stem
pub fn read_csv(path: &Path) -> FinsightResult<Table> {
    let file = std::fs::File::open(path)?;
    read_csv_from(table_name(path), file)
}

pub(crate) fn read_csv_from<R: Read>(name: String, reader: R) -> FinsightResult<Table> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let headers = dedupe_headers(headers);

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (column, cell) in cells.iter_mut().zip(record.iter()) {
            column.push(cell.to_string());
        }
    }

    let mut table = Table::new(name);
    for (header, column_cells) in headers.into_iter().zip(cells) {
        table.add_column(infer_column(header, column_cells));
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnValue;

    #[test]
    fn test_read_csv_kinds() {
        let data = "Quarter,Revenue,Net Income\nQ1,1000,100\nQ2,1200,\nQ3,1100,125\n";
        let table = read_csv_from("q".to_string(), data.as_bytes()).unwrap();

        assert_eq!(table.column_names(), vec!["Quarter", "Revenue", "Net Income"]);
        assert_eq!(table.row_count(), 3);
        assert!(!table.column("Quarter").unwrap().is_numeric());
        assert_eq!(
            table.column("Net Income").unwrap().values,
            ColumnValue::Number(vec![Some(100.0), None, Some(125.0)])
        );
    }

    #[test]
    fn test_header_only_csv_is_empty_table() {
        let table = read_csv_from("q".to_string(), "a,b\n".as_bytes()).unwrap();
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.row_count(), 0);
    }

    #[test]
    fn test_ragged_rows_error() {
        let data = "a,b\n1,2\n3\n";
        assert!(read_csv_from("q".to_string(), data.as_bytes()).is_err());
    }
}
