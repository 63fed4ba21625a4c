//! Table loading from CSV, Excel and YAML files
//!
//! The format is picked from the file extension. Every loader infers a column's kind
//! the same way: numeric when every non-empty cell is a finite number, text otherwise.

mod csv_reader;
mod excel;
mod yaml;

pub use csv_reader::read_csv;
pub use excel::ExcelImporter;
pub use yaml::{parse_yaml_table, read_yaml};

use crate::config::AnalysisConfig;
use crate::error::{FinsightError, FinsightResult};
use crate::types::{Column, ColumnValue, Table};
use std::path::Path;
use tracing::{debug, info};

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Excel,
    Yaml,
}

impl TableFormat {
    /// Detect format from the file extension (case-insensitive)
    pub fn from_path(path: &Path) -> FinsightResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(TableFormat::Csv),
            "xlsx" | "xls" => Ok(TableFormat::Excel),
            "yaml" | "yml" => Ok(TableFormat::Yaml),
            _ => Err(FinsightError::UnsupportedFormat(format!(
                "'{}' (expected .csv, .xlsx, .xls, .yaml or .yml)",
                path.display()
            ))),
        }
    }
}

/// Load a table, enforcing the configured size limit and equal column lengths
pub fn load_table(path: &Path, config: &AnalysisConfig) -> FinsightResult<Table> {
    let format = TableFormat::from_path(path)?;

    let size = std::fs::metadata(path)?.len();
    if size > config.max_file_bytes {
        return Err(FinsightError::Validation(format!(
            "'{}' is {} bytes, limit is {} bytes",
            path.display(),
            size,
            config.max_file_bytes
        )));
    }

    debug!(path = %path.display(), ?format, size, "loading table");

    let table = match format {
        TableFormat::Csv => read_csv(path)?,
        TableFormat::Excel => ExcelImporter::new(path).import()?,
        TableFormat::Yaml => read_yaml(path)?,
    };

    table
        .validate_lengths()
        .map_err(|e| FinsightError::Validation(format!("Table '{}': {}", table.name, e)))?;

    info!(
        table = %table.name,
        columns = table.columns.len(),
        rows = table.row_count(),
        "table loaded"
    );
    Ok(table)
}

/// Load several tables, stopping at the first failure
pub fn load_tables(paths: &[impl AsRef<Path>], config: &AnalysisConfig) -> FinsightResult<Vec<Table>> {
    paths
        .iter()
        .map(|p| load_table(p.as_ref(), config))
        .collect()
}

/// Table name for a file: its stem
pub(crate) fn table_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("table")
        .to_string()
}

/// Cell markers treated as missing in text-based sources
const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "null", "NULL", "None", "#N/A", "-",
];

pub(crate) fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell.trim())
}

pub(crate) fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Infer a column from raw text cells
pub(crate) fn infer_column(name: String, cells: Vec<String>) -> Column {
    let numeric = cells
        .iter()
        .all(|cell| is_missing(cell) || parse_number(cell).is_some());

    let values = if numeric {
        ColumnValue::Number(
            cells
                .iter()
                .map(|cell| if is_missing(cell) { None } else { parse_number(cell) })
                .collect(),
        )
    } else {
        ColumnValue::Text(cells)
    };
    Column::new(name, values)
}

/// Make header names unique by suffixing repeats with `.1`, `.2`, ...
pub(crate) fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(headers.len());
    for header in headers {
        let mut candidate = header.clone();
        let mut n = 1;
        while seen.contains(&candidate) {
            candidate = format!("{header}.{n}");
            n += 1;
        }
        seen.push(candidate);
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            TableFormat::from_path(&PathBuf::from("q.CSV")).unwrap(),
            TableFormat::Csv
        );
        assert_eq!(
            TableFormat::from_path(&PathBuf::from("q.xls")).unwrap(),
            TableFormat::Excel
        );
        assert_eq!(
            TableFormat::from_path(&PathBuf::from("q.yml")).unwrap(),
            TableFormat::Yaml
        );
        assert!(matches!(
            TableFormat::from_path(&PathBuf::from("q.pdf")),
            Err(FinsightError::UnsupportedFormat(_))
        ));
        assert!(TableFormat::from_path(&PathBuf::from("noext")).is_err());
    }

    #[test]
    fn test_infer_numeric_with_missing() {
        let column = infer_column(
            "revenue".to_string(),
            vec!["100".into(), "".into(), "N/A".into(), " 2.5 ".into()],
        );
        assert_eq!(
            column.values,
            ColumnValue::Number(vec![Some(100.0), None, None, Some(2.5)])
        );
    }

    #[test]
    fn test_infer_text() {
        let column = infer_column("quarter".to_string(), vec!["Q1".into(), "2".into()]);
        assert!(!column.is_numeric());
    }

    #[test]
    fn test_infinity_is_text() {
        let column = infer_column("x".to_string(), vec!["inf".into()]);
        assert!(!column.is_numeric());
    }

    #[test]
    fn test_dedupe_headers() {
        let headers = vec!["a".to_string(), "b".to_string(), "a".to_string(), "a".to_string()];
        assert_eq!(dedupe_headers(headers), vec!["a", "b", "a.1", "a.2"]);
    }

    #[test]
    fn test_table_name_from_stem() {
        assert_eq!(table_name(Path::new("data/q1_2024.csv")), "q1_2024");
    }
}
