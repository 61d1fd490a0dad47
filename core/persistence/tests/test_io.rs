//! FILENAME: tests/test_io.rs
//! Source loading by extension and artifact writing.

mod common;

use common::{failed_counts_report, Scratch};
use engine::{CellValue, ColorPair, StyleConfig};
use lopdf::Document;
use persistence::{load_source, load_spreadsheet, write_artifacts, LoadError, RenderError};

// ============================================================================
// LOADING
// ============================================================================

#[test]
fn test_load_csv_source() {
    let scratch = Scratch::new();
    let path = scratch.write("runs.csv", "suite,test,duration\napi,login,1.5\nui,render,\n");

    let table = load_source(&path).unwrap();
    assert_eq!(table.columns, vec!["suite", "test", "duration"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.value(0, "duration"), Some(&CellValue::Number(1.5)));
    assert!(table.value(1, "duration").unwrap().is_blank());
}

#[test]
fn test_load_json_source() {
    let scratch = Scratch::new();
    let path = scratch.write(
        "runs.json",
        r#"{"data": [{"suite": "api", "duration": 2}, {"suite": "ui", "flaky": true}]}"#,
    );

    let table = load_source(&path).unwrap();
    assert_eq!(table.columns, vec!["suite", "duration", "flaky"]);
    assert_eq!(table.value(1, "flaky"), Some(&CellValue::Boolean(true)));
    assert!(table.value(0, "flaky").unwrap().is_blank());
}

#[test]
fn test_load_spreadsheet_source() {
    let scratch = Scratch::new();
    let path = scratch.dir.path().join("runs.xlsx");

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "suite").unwrap();
    sheet.write_string(0, 1, "duration").unwrap();
    sheet.write_string(1, 0, "api").unwrap();
    sheet.write_number(1, 1, 2.5).unwrap();
    workbook.save(&path).unwrap();

    let table = load_source(&path).unwrap();
    assert_eq!(table.columns, vec!["suite", "duration"]);
    assert_eq!(table.value(0, "duration"), Some(&CellValue::Number(2.5)));
}

#[test]
fn test_missing_and_unsupported_sources() {
    let scratch = Scratch::new();
    assert!(matches!(
        load_source(&scratch.dir.path().join("nope.csv")),
        Err(LoadError::SourceNotFound(_))
    ));

    let path = scratch.write("runs.parquet", "PAR1");
    assert!(matches!(load_source(&path), Err(LoadError::UnsupportedFormat(ext)) if ext == "parquet"));
}

// ============================================================================
// WRITING
// ============================================================================

#[test]
fn test_write_artifacts_produces_both_files() {
    let scratch = Scratch::new();
    let report = failed_counts_report();
    let out = scratch.dir.path().join("reports");

    let artifacts = write_artifacts(&report, &StyleConfig::default(), &out).unwrap();

    assert_eq!(artifacts.pdf_file.extension().unwrap(), "pdf");
    assert_eq!(artifacts.excel_file.extension().unwrap(), "xlsx");

    let pdf = Document::load(&artifacts.pdf_file).unwrap();
    assert_eq!(pdf.get_pages().len(), 1);

    let sheet = load_spreadsheet(&artifacts.excel_file).unwrap();
    assert_eq!(sheet.columns, vec!["suite", "test", "Count"]);
    let last = sheet.rows.last().unwrap();
    assert!(last[0].is_grand_total_marker());
    assert_eq!(last[2], CellValue::Number(5.0));
}

#[test]
fn test_bad_style_writes_nothing() {
    let scratch = Scratch::new();
    let report = failed_counts_report();
    let mut styles = StyleConfig::default();
    styles
        .colors
        .insert("subtotal".to_string(), ColorPair::new("zzzzzz", "000000"));

    let result = write_artifacts(&report, &styles, scratch.dir.path());
    assert!(matches!(result, Err(RenderError::InvalidStyle(_))));
    assert_eq!(scratch.file_count(), 0);
}
