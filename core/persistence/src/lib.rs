//! FILENAME: core/persistence/src/lib.rs
//! Report Persistence Module
//!
//! Loads source tables (CSV, JSON, spreadsheets) and writes finished
//! reports as XLSX workbooks and PDF documents.

mod csv_reader;
mod error;
mod json_reader;
mod naming;
mod pdf_writer;
mod render;
mod xlsx_reader;
mod xlsx_writer;

pub use csv_reader::{load_csv, read_csv};
pub use error::{LoadError, RenderError};
pub use json_reader::{json_to_cell, load_json, parse_json_rows, table_from_json};
pub use naming::{output_dir_for, timestamped_path, timestamped_path_at, ARTIFACT_STEM};
pub use pdf_writer::{page_size, PdfRenderer};
pub use render::{render_to, ReportRenderer, StyleSheet};
pub use xlsx_reader::load_spreadsheet;
pub use xlsx_writer::{XlsxRenderer, SHEET_NAME};

use engine::{StyleConfig, Table};
use pivot_engine::PivotReport;
use std::path::{Path, PathBuf};

/// Loads a source file, choosing the reader by extension.
pub fn load_source(path: &Path) -> Result<Table, LoadError> {
    if !path.exists() {
        return Err(LoadError::SourceNotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" | "txt" => load_csv(path),
        "json" => load_json(path),
        "xlsx" | "xlsm" | "xls" | "ods" => load_spreadsheet(path),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

/// Paths of the two artifacts written for one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub pdf_file: PathBuf,
    pub excel_file: PathBuf,
}

/// Renders `report` as PDF and XLSX into `dir` under timestamped names.
/// If the second artifact fails the first is removed too, so a run yields
/// both files or none.
pub fn write_artifacts(
    report: &PivotReport,
    styles: &StyleConfig,
    dir: &Path,
) -> Result<Artifacts, RenderError> {
    std::fs::create_dir_all(dir)?;

    let pdf_file = timestamped_path(dir, PdfRenderer.extension());
    render_to(&PdfRenderer, report, styles, &pdf_file)?;

    let excel_file = timestamped_path(dir, XlsxRenderer.extension());
    if let Err(err) = render_to(&XlsxRenderer, report, styles, &excel_file) {
        let _ = std::fs::remove_file(&pdf_file);
        return Err(err);
    }

    Ok(Artifacts {
        pdf_file,
        excel_file,
    })
}
