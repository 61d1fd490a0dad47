//! FILENAME: core/persistence/src/xlsx_reader.rs

use crate::LoadError;
use calamine::{open_workbook_auto, Data, Reader};
use engine::{CellValue, Table};
use std::path::Path;

/// Loads the first sheet of a spreadsheet (xlsx, xls, ods). The first row
/// holds the column names.
pub fn load_spreadsheet(path: &Path) -> Result<Table, LoadError> {
    if !path.exists() {
        return Err(LoadError::SourceNotFound(path.to_path_buf()));
    }

    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LoadError::MalformedPayload("workbook contains no sheets".to_string()))??;

    let mut rows = range.rows();
    let columns: Vec<String> = match rows.next() {
        Some(header) => header
            .iter()
            .map(|cell| data_to_cell(cell).display_value().trim().to_string())
            .collect(),
        None => return Ok(Table::new(Vec::new())),
    };

    let mut table = Table::new(columns);
    for row in rows {
        let cells: Vec<CellValue> = row.iter().map(data_to_cell).collect();
        if cells.iter().all(CellValue::is_blank) {
            continue;
        }
        table.push_row(cells);
    }

    log::debug!(
        "load_spreadsheet: {} columns, {} rows from {}",
        table.column_count(),
        table.row_count(),
        path.display()
    );
    Ok(table)
}

fn data_to_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Text(format!("{:?}", e)),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
