//! YAML import: a top-level mapping of column name to array
//!
//! ```yaml
//! quarter: [Q1, Q2, Q3]
//! revenue: [1000, 1200, ~]
//! ```

use super::{dedupe_headers, table_name};
use crate::error::{FinsightError, FinsightResult};
use crate::types::{Column, ColumnValue, Table};
use serde_yaml::Value;
use std::path::Path;

/// Read a YAML table file, named after the file stem
pub fn read_yaml(path: &Path) -> FinsightResult<Table> {
    let content = std::fs::read_to_string(path)?;
    parse_yaml_table(&table_name(path), &content)
}

/// Parse YAML text into a table
pub fn parse_yaml_table(name: &str, content: &str) -> FinsightResult<Table> {
    let root: Value = serde_yaml::from_str(content)?;
    let map = match root {
        Value::Mapping(map) => map,
        Value::Null => return Ok(Table::new(name)),
        other => {
            return Err(FinsightError::Parse(format!(
                "Table '{}' must be a mapping of column name to array, found {}",
                name,
                type_name(&other)
            )))
        }
    };

    let mut names = Vec::with_capacity(map.len());
    let mut values = Vec::with_capacity(map.len());
    for (key, value) in &map {
        let col_name = match key {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => {
                return Err(FinsightError::Parse(
                    "Column name must be a string".to_string(),
                ))
            }
        };

        let Value::Sequence(seq) = value else {
            return Err(FinsightError::Parse(format!(
                "Column '{}' in table '{}' must be an array",
                col_name, name
            )));
        };

        values.push(parse_array_value(&col_name, seq)?);
        names.push(col_name);
    }

    let mut table = Table::new(name);
    for (col_name, column_value) in dedupe_headers(names).into_iter().zip(values) {
        table.add_column(Column::new(col_name, column_value));
    }
    Ok(table)
}

/// Column kind comes from the first non-null element; nulls are missing cells
fn parse_array_value(col_name: &str, seq: &[Value]) -> FinsightResult<ColumnValue> {
    let first = seq.iter().find(|v| !v.is_null());

    match first {
        None | Some(Value::Number(_)) => {
            let mut numbers = Vec::with_capacity(seq.len());
            for (i, val) in seq.iter().enumerate() {
                match val {
                    Value::Null => numbers.push(None),
                    Value::Number(n) => match n.as_f64().filter(|f| f.is_finite()) {
                        Some(f) => numbers.push(Some(f)),
                        None => {
                            return Err(FinsightError::Parse(format!(
                                "Column '{}' row {}: Invalid number format",
                                col_name, i
                            )))
                        }
                    },
                    _ => return Err(mismatch(col_name, i, "Number", val)),
                }
            }
            Ok(ColumnValue::Number(numbers))
        }
        Some(Value::String(_)) => {
            let mut texts = Vec::with_capacity(seq.len());
            for (i, val) in seq.iter().enumerate() {
                match val {
                    Value::Null => texts.push(String::new()),
                    Value::String(s) => texts.push(s.clone()),
                    _ => return Err(mismatch(col_name, i, "Text", val)),
                }
            }
            Ok(ColumnValue::Text(texts))
        }
        Some(other) => Err(FinsightError::Parse(format!(
            "Column '{}': unsupported value type {}",
            col_name,
            type_name(other)
        ))),
    }
}

fn mismatch(col_name: &str, row: usize, expected: &str, found: &Value) -> FinsightError {
    FinsightError::Parse(format!(
        "Column '{}' row {}: Expected {}, found {}",
        col_name,
        row,
        expected,
        type_name(found)
    ))
}

fn type_name(val: &Value) -> &'static str {
    match val {
        Value::Null => "Null",
        Value::Bool(_) => "Boolean",
        Value::Number(_) => "Number",
        Value::String(_) => "String",
        Value::Sequence(_) => "Array",
        Value::Mapping(_) => "Mapping",
        Value::Tagged(_) => "Tagged",
    }
}
