//! FILENAME: core/persistence/src/render.rs
//! Shared renderer contract.
//!
//! Both output formats consume the same `PivotReport` and `StyleConfig`.
//! Style and alignment decisions live here so the spreadsheet and the
//! document agree cell for cell.

use crate::RenderError;
use engine::style::DEFAULT_BUCKET;
use engine::{CellKind, CellStyle, CellValue, StyleConfig, TextAlign};
use pivot_engine::PivotReport;
use std::collections::HashMap;
use std::path::Path;

/// A renderer writes one artifact for a finished report.
pub trait ReportRenderer {
    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    /// Writes the artifact to `path`.
    fn render(&self, report: &PivotReport, styles: &StyleConfig, path: &Path) -> Result<(), RenderError>;
}

/// Runs `renderer` and removes the target file if rendering fails, so a
/// failed run never leaves a partial artifact behind.
pub fn render_to(
    renderer: &dyn ReportRenderer,
    report: &PivotReport,
    styles: &StyleConfig,
    path: &Path,
) -> Result<(), RenderError> {
    match renderer.render(report, styles, path) {
        Ok(()) => {
            log::info!("wrote {}", path.display());
            Ok(())
        }
        Err(err) => {
            if path.exists() {
                if let Err(io) = std::fs::remove_file(path) {
                    log::warn!("could not remove partial file {}: {}", path.display(), io);
                }
            }
            Err(err)
        }
    }
}

// ============================================================================
// STYLE SHEET
// ============================================================================

/// Styles resolved once per report, keyed by bucket.
#[derive(Debug, Clone)]
pub struct StyleSheet {
    resolved: HashMap<String, CellStyle>,
    default: CellStyle,
}

impl StyleSheet {
    /// Resolves every bucket the report uses. Fails on the first invalid
    /// colour, before anything is written.
    pub fn build(report: &PivotReport, styles: &StyleConfig) -> Result<Self, RenderError> {
        styles.validate()?;
        let default = styles.resolve(DEFAULT_BUCKET)?;
        let mut resolved = HashMap::new();
        for row_style in &report.row_styles {
            let bucket = row_style.bucket();
            if !resolved.contains_key(&bucket) {
                let style = styles.resolve(&bucket)?;
                resolved.insert(bucket, style);
            }
        }
        Ok(StyleSheet { resolved, default })
    }

    /// Style of one display cell. Cells left of the row's start column keep
    /// the default style.
    pub fn cell_style(&self, report: &PivotReport, row: usize, col: usize) -> CellStyle {
        match report.row_style(row) {
            Some(rs) if col >= rs.start_col => self
                .resolved
                .get(&rs.bucket())
                .copied()
                .unwrap_or(self.default),
            _ => self.default,
        }
    }
}

/// Alignment category of one display cell.
pub fn cell_kind(report: &PivotReport, row: usize, value: &CellValue) -> CellKind {
    if row == 0 {
        return CellKind::Header;
    }
    if value.as_number().is_some() {
        return CellKind::Number;
    }
    let is_total = report
        .row_style(row)
        .map(|rs| rs.class.is_total())
        .unwrap_or(false);
    if is_total {
        CellKind::TotalText
    } else {
        CellKind::Text
    }
}

/// Resolved horizontal alignment for one display cell. `General` is
/// decided here: numbers right, everything else left.
pub fn cell_alignment(report: &PivotReport, styles: &StyleConfig, row: usize, value: &CellValue) -> TextAlign {
    match styles.alignment.resolve(cell_kind(report, row, value)) {
        TextAlign::General if value.as_number().is_some() => TextAlign::Right,
        TextAlign::General => TextAlign::Left,
        other => other,
    }
}

/// Longest display string per column, header included.
pub fn column_char_widths(report: &PivotReport) -> Vec<usize> {
    let table = &report.table;
    (0..table.columns.len())
        .map(|col| {
            (0..table.display_row_count())
                .map(|row| table.display_cell(row, col).display_value().chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect()
}

