//! FILENAME: app/src/controller.rs
// PURPOSE: Runs one report end to end: load, calculate, render.
// CONTEXT: Shared by the CLI and the HTTP endpoint. Every call builds its own
// tables and style objects; nothing is kept between runs.

use std::path::Path;
use engine::Table;
use persistence::{load_source, output_dir_for, table_from_json, write_artifacts, Artifacts, LoadError};
use pivot_engine::calculate_report;
use serde_json::Value;

use crate::config::ReportConfig;
use crate::error::{ConfigError, ReportError};
use crate::logging::{log_debug, log_enter, log_enter_info, log_exit, log_exit_info, log_info, log_warn};

/// Default directory for runs whose data did not come from a file.
pub const DEFAULT_OUTPUT_DIR: &str = "data";

const PREVIEW_ROWS: usize = 5;

/// Runs the pipeline over `table` and writes both artifacts into `out_dir`.
/// `Ok(None)` means there was nothing to report; a warning has been logged.
pub fn generate_report(
    table: &Table,
    config: &ReportConfig,
    out_dir: &Path,
) -> Result<Option<Artifacts>, ReportError> {
    log_enter_info!("REPORT", "generate_report", "rows={} out={}", table.row_count(), out_dir.display());
    log_preview(table);

    if table.is_empty() {
        log_warn!("REPORT", "No data found in the input.");
        return Ok(None);
    }

    let definition = config.data.to_definition()?;
    let report = match calculate_report(table, &definition)? {
        Some(report) => report,
        None => {
            log_warn!("REPORT", "No rows left after filtering; no files written.");
            return Ok(None);
        }
    };

    let artifacts = write_artifacts(&report, &config.styles, out_dir)?;
    for path in [&artifacts.pdf_file, &artifacts.excel_file] {
        log_info!("REPORT", "{} file built successfully.", describe(path));
    }

    log_exit_info!("REPORT", "generate_report", "grand_total={}", report.grand_total);
    Ok(Some(artifacts))
}

/// File run: the source path comes from `data.csv_file_path`; artifacts are
/// written next to it.
pub fn process_file(config: &ReportConfig) -> Result<Option<Artifacts>, ReportError> {
    let source = config
        .data
        .csv_file_path
        .as_deref()
        .ok_or_else(|| ConfigError::MissingKeys(vec!["data.csv_file_path".to_string()]))?;
    let source = Path::new(source);
    log_enter!("REPORT", "process_file", "source={}", source.display());

    if !source.is_file() {
        return Err(LoadError::SourceNotFound(source.to_path_buf()).into());
    }

    let table = load_source(source)?;
    log_exit!("REPORT", "process_file", "loaded {} rows", table.row_count());
    generate_report(&table, config, &output_dir_for(source))
}

/// Inline JSON run (`--json-data`).
pub fn process_json(config: &ReportConfig, json_text: &str, out_dir: &Path) -> Result<Option<Artifacts>, ReportError> {
    let payload: Value = serde_json::from_str(json_text)
        .map_err(|e| LoadError::MalformedPayload(e.to_string()))?;
    process_payload(config, &payload, out_dir)
}

/// Already-parsed payload: rows, a column object, or `{"data": ...}`.
pub fn process_payload(config: &ReportConfig, payload: &Value, out_dir: &Path) -> Result<Option<Artifacts>, ReportError> {
    log_enter!("REPORT", "process_payload");
    let table = table_from_json(payload)?;
    log_exit!("REPORT", "process_payload", "parsed {} rows", table.row_count());
    generate_report(&table, config, out_dir)
}

fn describe(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("pdf") => "PDF",
        Some("xlsx") => "EXCEL",
        _ => "Output",
    }
}

fn log_preview(table: &Table) {
    log_debug!("REPORT", "columns: {}", table.columns.join(" | "));
    for row in table.rows.iter().take(PREVIEW_ROWS) {
        let cells: Vec<String> = row.iter().map(|c| c.display_value()).collect();
        log_debug!("REPORT", "{}", cells.join(" | "));
    }
}
