//! FILENAME: core/persistence/src/csv_reader.rs

use crate::LoadError;
use csv::ReaderBuilder;
use engine::{CellValue, Table};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Loads a delimited file with a header row.
pub fn load_csv(path: &Path) -> Result<Table, LoadError> {
    if !path.exists() {
        return Err(LoadError::SourceNotFound(path.to_path_buf()));
    }
    let file = File::open(path)?;
    read_csv(file)
}

/// Reads CSV text from any reader. Each cell is typed on its own:
/// blank stays blank, numeric text becomes a number, the rest is text.
/// Short records are padded with blanks.
pub fn read_csv<R: Read>(reader: R) -> Result<Table, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
        return Ok(Table::new(Vec::new()));
    }

    let mut table = Table::new(columns);
    for record in rdr.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        table.push_row(record.iter().map(CellValue::infer).collect());
    }

    log::debug!(
        "read_csv: {} columns, {} rows",
        table.column_count(),
        table.row_count()
    );
    Ok(table)
}
