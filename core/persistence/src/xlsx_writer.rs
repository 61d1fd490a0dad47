//! FILENAME: core/persistence/src/xlsx_writer.rs

use crate::render::{cell_alignment, column_char_widths, ReportRenderer, StyleSheet};
use crate::RenderError;
use engine::style::{CellStyle, Color, TextAlign};
use engine::{CellValue, StyleConfig};
use pivot_engine::PivotReport;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook as XlsxWorkbook, Worksheet};
use std::path::Path;

pub const SHEET_NAME: &str = "Report";

const HEADER_ROW_HEIGHT: f64 = 35.0;
const DATA_ROW_HEIGHT: f64 = 25.0;
const COLUMN_PADDING: f64 = 5.0;

/// Spreadsheet output: one sheet, styled rows, vertical merges.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxRenderer;

impl ReportRenderer for XlsxRenderer {
    fn extension(&self) -> &'static str {
        "xlsx"
    }

    fn render(&self, report: &PivotReport, styles: &StyleConfig, path: &Path) -> Result<(), RenderError> {
        let sheet = StyleSheet::build(report, styles)?;
        let mut xlsx = XlsxWorkbook::new();
        let worksheet = xlsx.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, chars) in column_char_widths(report).iter().enumerate() {
            worksheet.set_column_width(col as u16, *chars as f64 + COLUMN_PADDING)?;
        }

        let table = &report.table;
        for row in 0..table.display_row_count() {
            let height = if row == 0 { HEADER_ROW_HEIGHT } else { DATA_ROW_HEIGHT };
            worksheet.set_row_height(row as u32, height)?;

            for col in 0..table.columns.len() {
                if report.is_merged_away(col, row) {
                    continue;
                }
                let value = table.display_cell(row, col);
                let align = cell_alignment(report, styles, row, &value);
                let format = convert_style_to_format(&sheet.cell_style(report, row, col), align);

                match report.span_at(col, row) {
                    Some(span) => {
                        worksheet.merge_range(
                            span.start_row as u32,
                            col as u16,
                            span.end_row as u32,
                            col as u16,
                            "",
                            &format,
                        )?;
                        write_value(worksheet, row as u32, col as u16, &value, &format)?;
                    }
                    None => write_value(worksheet, row as u32, col as u16, &value, &format)?,
                }
            }
        }

        xlsx.save(path)?;
        Ok(())
    }
}

fn write_value(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellValue,
    format: &Format,
) -> Result<(), RenderError> {
    match value {
        CellValue::Number(n) if !n.is_nan() => {
            worksheet.write_number_with_format(row, col, *n, format)?;
        }
        CellValue::Boolean(b) => {
            worksheet.write_boolean_with_format(row, col, *b, format)?;
        }
        CellValue::Text(s) if !s.is_empty() => {
            worksheet.write_string_with_format(row, col, s, format)?;
        }
        _ => {
            worksheet.write_blank(row, col, format)?;
        }
    }
    Ok(())
}

fn convert_style_to_format(style: &CellStyle, align: TextAlign) -> Format {
    let mut format = Format::new()
        .set_background_color(color_to_xlsx(&style.background))
        .set_font_color(color_to_xlsx(&style.text_color))
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::VerticalCenter);

    if style.bold {
        format = format.set_bold();
    }

    format.set_align(match align {
        TextAlign::Left => FormatAlign::Left,
        TextAlign::Center => FormatAlign::Center,
        TextAlign::Right => FormatAlign::Right,
        TextAlign::General => FormatAlign::General,
    })
}

fn color_to_xlsx(color: &Color) -> rust_xlsxwriter::Color {
    rust_xlsxwriter::Color::RGB(color.to_rgb_u32())
}
