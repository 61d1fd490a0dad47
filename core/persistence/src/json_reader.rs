//! FILENAME: core/persistence/src/json_reader.rs
//! Structured row payloads.
//!
//! Accepted shapes:
//! - `[{"col": value, ...}, ...]` (records; columns in first-seen order)
//! - `{"col": [values...], ...}` (columns; shorter columns padded)
//! - `{"data": <either of the above>}`

use crate::LoadError;
use engine::{CellValue, Table};
use serde_json::{Map, Value};
use std::path::Path;

pub fn load_json(path: &Path) -> Result<Table, LoadError> {
    if !path.exists() {
        return Err(LoadError::SourceNotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path)?;
    parse_json_rows(&text)
}

/// Parses JSON text into a table.
pub fn parse_json_rows(text: &str) -> Result<Table, LoadError> {
    let value: Value = serde_json::from_str(text)?;
    table_from_json(&value)
}

/// Builds a table from an already parsed payload.
pub fn table_from_json(value: &Value) -> Result<Table, LoadError> {
    match value {
        Value::Array(items) => records_to_table(items),
        Value::Object(map) => match map.get("data") {
            Some(inner) if is_data_wrapper(map, inner) => table_from_json(inner),
            _ => columns_to_table(map),
        },
        other => Err(LoadError::MalformedPayload(format!(
            "expected an array of rows or an object of columns, found {}",
            kind_of(other)
        ))),
    }
}

/// Converts one JSON scalar to a cell. Nested values keep their JSON text.
pub fn json_to_cell(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Empty,
        Value::Bool(b) => CellValue::Boolean(*b),
        Value::Number(n) => n.as_f64().map(CellValue::Number).unwrap_or_default(),
        Value::String(s) => CellValue::Text(s.clone()),
        nested => CellValue::Text(nested.to_string()),
    }
}

fn records_to_table(items: &[Value]) -> Result<Table, LoadError> {
    let mut columns: Vec<String> = Vec::new();
    let mut records: Vec<&Map<String, Value>> = Vec::with_capacity(items.len());

    for (i, item) in items.iter().enumerate() {
        let record = item.as_object().ok_or_else(|| {
            LoadError::MalformedPayload(format!("row {} is {}, expected an object", i, kind_of(item)))
        })?;
        for key in record.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
        records.push(record);
    }

    let mut table = Table::new(columns);
    for record in records {
        let row = table
            .columns
            .iter()
            .map(|c| record.get(c).map(json_to_cell).unwrap_or_default())
            .collect();
        table.push_row(row);
    }
    Ok(table)
}

/// A `data` key wraps the payload when it holds an object, rows, or is the
/// only key with an empty array. An array of scalars is a column named `data`.
fn is_data_wrapper(map: &Map<String, Value>, inner: &Value) -> bool {
    match inner {
        Value::Object(_) => true,
        Value::Array(items) if items.is_empty() => map.len() == 1,
        Value::Array(items) => items.iter().any(Value::is_object),
        _ => false,
    }
}

fn columns_to_table(map: &Map<String, Value>) -> Result<Table, LoadError> {
    let mut columns = Vec::with_capacity(map.len());
    let mut arrays = Vec::with_capacity(map.len());

    for (name, values) in map {
        let values = values.as_array().ok_or_else(|| {
            LoadError::MalformedPayload(format!(
                "column '{}' is {}, expected an array",
                name,
                kind_of(values)
            ))
        })?;
        columns.push(name.clone());
        arrays.push(values);
    }

    let height = arrays.iter().map(|a| a.len()).max().unwrap_or(0);
    let mut table = Table::new(columns);
    for r in 0..height {
        table.push_row(
            arrays
                .iter()
                .map(|a| a.get(r).map(json_to_cell).unwrap_or_default())
                .collect(),
        );
    }
    Ok(table)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_union_keys_in_first_seen_order() {
        let payload = json!([
            {"g": "A", "v": 1},
            {"g": "B", "extra": true},
        ]);
        let table = table_from_json(&payload).unwrap();
        assert_eq!(table.columns, vec!["g", "v", "extra"]);
        assert_eq!(
            table.rows[1],
            vec![CellValue::text("B"), CellValue::Empty, CellValue::Boolean(true)]
        );
    }

    #[test]
    fn test_column_object() {
        let payload = json!({"g": ["A", "B"], "v": [1.5]});
        let table = table_from_json(&payload).unwrap();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows[1], vec![CellValue::text("B"), CellValue::Empty]);
    }

    #[test]
    fn test_data_wrapper() {
        let payload = json!({"data": [{"g": "A"}]});
        let table = table_from_json(&payload).unwrap();
        assert_eq!(table.columns, vec!["g"]);
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_data_wrapper_with_several_rows() {
        let payload = json!({"data": [{"g": "A", "v": 1}, {"g": "B", "v": 2}]});
        let table = table_from_json(&payload).unwrap();
        assert_eq!(table.columns, vec!["g", "v"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.value(1, "v"), Some(&CellValue::Number(2.0)));
    }

    #[test]
    fn test_data_wrapper_around_columns() {
        let payload = json!({"data": {"g": ["A", "B"], "v": [1, 2]}});
        let table = table_from_json(&payload).unwrap();
        assert_eq!(table.columns, vec!["g", "v"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_lone_scalar_data_array_is_a_column() {
        let payload = json!({"data": [1, 2]});
        let table = table_from_json(&payload).unwrap();
        assert_eq!(table.columns, vec!["data"]);
        assert_eq!(table.rows[1], vec![CellValue::Number(2.0)]);
    }

    #[test]
    fn test_data_named_column_is_not_a_wrapper() {
        let payload = json!({"data": [1, 2], "other": [3, 4]});
        let table = table_from_json(&payload).unwrap();
        assert_eq!(table.columns, vec!["data", "other"]);
    }

    #[test]
    fn test_malformed_payloads() {
        assert!(matches!(
            table_from_json(&json!("rows")),
            Err(LoadError::MalformedPayload(_))
        ));
        assert!(matches!(
            table_from_json(&json!([1, 2])),
            Err(LoadError::MalformedPayload(_))
        ));
        assert!(matches!(
            parse_json_rows("{not json"),
            Err(LoadError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_nested_values_keep_json_text() {
        assert_eq!(json_to_cell(&json!({"a": 1})), CellValue::text("{\"a\":1}"));
        assert_eq!(json_to_cell(&json!(null)), CellValue::Empty);
    }
}
