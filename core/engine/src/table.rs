//! FILENAME: core/engine/src/table.rs
//! PURPOSE: The in-memory table passed between pipeline stages.
//! CONTEXT: A `Table` is an ordered column schema plus dense rows of
//! `CellValue`s. Column order is significant: it is the render order.
//! Tables are built once per run and handed from stage to stage by value or
//! by shared reference; stages that need to edit cells clone first.

use serde::{Deserialize, Serialize};
use crate::cell::CellValue;

/// One record: values in schema order.
pub type Row = Vec<CellValue>;

/// An ordered sequence of rows sharing one column schema.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    /// Column names in display order.
    pub columns: Vec<String>,

    /// Row storage. Every row has exactly `columns.len()` cells.
    pub rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table with the given schema.
    pub fn new(columns: Vec<String>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a table from a schema and rows, padding or truncating each row
    /// to the schema width.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> Self {
        let mut table = Table::new(columns);
        for row in rows {
            table.push_row(row);
        }
        table
    }

    /// Appends a row, normalizing its width to the schema.
    pub fn push_row(&mut self, mut row: Row) {
        row.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(row);
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column in the schema.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Returns the names from `wanted` that the schema does not contain,
    /// preserving their order.
    pub fn missing_columns<'a, I>(&self, wanted: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        wanted
            .into_iter()
            .filter(|name| !self.has_column(name))
            .cloned()
            .collect()
    }

    /// Cell lookup by row index and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&CellValue> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Iterates one column top to bottom.
    pub fn column_values(&self, col: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().map(move |r| r.get(col).unwrap_or(&CellValue::Empty))
    }

    /// Returns a copy with the columns rearranged into `order`.
    /// Names not present in the schema are skipped.
    pub fn reorder_columns(&self, order: &[String]) -> Table {
        let indices: Vec<usize> = order
            .iter()
            .filter_map(|name| self.column_index(name))
            .collect();

        Table {
            columns: indices.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            vec!["g".to_string(), "v".to_string()],
            vec![
                vec![CellValue::text("A"), CellValue::Number(1.0)],
                vec![CellValue::text("B")],
            ],
        )
    }

    #[test]
    fn rows_are_padded_to_schema_width() {
        let table = sample();
        assert_eq!(table.rows[1], vec![CellValue::text("B"), CellValue::Empty]);
    }

    #[test]
    fn lookup_by_column_name() {
        let table = sample();
        assert_eq!(table.value(0, "v"), Some(&CellValue::Number(1.0)));
        assert_eq!(table.value(0, "missing"), None);
        assert_eq!(table.column_index("g"), Some(0));
    }

    #[test]
    fn missing_columns_keeps_request_order() {
        let table = sample();
        let wanted = vec!["x".to_string(), "g".to_string(), "y".to_string()];
        assert_eq!(table.missing_columns(&wanted), vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn reorder_moves_columns() {
        let table = sample();
        let reordered = table.reorder_columns(&["v".to_string(), "g".to_string()]);
        assert_eq!(reordered.columns, vec!["v".to_string(), "g".to_string()]);
        assert_eq!(reordered.rows[0], vec![CellValue::Number(1.0), CellValue::text("A")]);
    }
}
