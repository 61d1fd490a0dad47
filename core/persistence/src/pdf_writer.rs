//! FILENAME: core/persistence/src/pdf_writer.rs
//! Paginated document output.
//!
//! The report is drawn as a grid with the standard Type1 Helvetica faces, so
//! no font files are embedded. Page size follows the table: wide tables get
//! wide pages, clamped to the configured minimum and maximum. With
//! pagination on, rows flow over as many pages as needed and the header row
//! repeats on each; a merge span that reaches past a page break continues on
//! the next page with its value shown again.

use crate::render::{cell_alignment, column_char_widths, ReportRenderer, StyleSheet};
use crate::RenderError;
use engine::style::{CellStyle, TextAlign};
use engine::{CellValue, StyleConfig};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use pivot_engine::PivotReport;
use std::path::Path;

const POINTS_PER_INCH: f32 = 72.0;
const ROW_HEIGHT: f32 = 0.25 * POINTS_PER_INCH;
const HEADER_FOOTER_HEIGHT: f32 = 0.55 * POINTS_PER_INCH;
const LETTER: [f32; 2] = [612.0, 792.0];

const FONT_SIZE: f32 = 10.0;
const CELL_PADDING: f32 = 6.0;
/// Average Helvetica glyph width as a fraction of the font size.
const AVG_GLYPH_WIDTH: f32 = 0.55;
const GRID_LINE_WIDTH: f32 = 1.0;

const REGULAR_FONT: &[u8] = b"F1";
const BOLD_FONT: &[u8] = b"F2";

/// Document output via `lopdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

impl ReportRenderer for PdfRenderer {
    fn extension(&self) -> &'static str {
        "pdf"
    }

    fn render(&self, report: &PivotReport, styles: &StyleConfig, path: &Path) -> Result<(), RenderError> {
        let sheet = StyleSheet::build(report, styles)?;
        let widths = column_widths(report);
        let table_width: f32 = widths.iter().sum();
        let total_rows = report.table.display_row_count();

        let [page_width, page_height] = page_size(table_width, total_rows, styles);
        let geometry = PageGeometry::new(page_width, page_height, table_width, styles);
        let chunks = paginate(total_rows, geometry.data_rows_per_page(), styles.paginate);

        log::debug!(
            "pdf: {} rows on {} page(s) of {:.0}x{:.0}pt",
            total_rows,
            chunks.len(),
            page_width,
            page_height
        );

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular_id = doc.add_object(font_dictionary("Helvetica"));
        let bold_id = doc.add_object(font_dictionary("Helvetica-Bold"));
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(chunks.len());
        for chunk in &chunks {
            let painter = PagePainter {
                report,
                styles,
                sheet: &sheet,
                widths: &widths,
                geometry: &geometry,
            };
            let content = Content {
                operations: painter.paint(chunk),
            };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(page_width),
                Object::Real(page_height),
            ],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();
        doc.save(path)?;
        Ok(())
    }
}

fn font_dictionary(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

// ============================================================================
// PAGE SIZING
// ============================================================================

/// Page size in points for a table of `table_width` points and `num_rows`
/// display rows.
///
/// Width is the table plus side margins; height is the estimated content
/// plus header/footer allowance and vertical margins. Both are clamped to
/// `[min_page_size, max_page_size]` (letter and twice letter by default).
/// Without pagination the height only has a lower bound, so everything fits
/// on one page.
pub fn page_size(table_width: f32, num_rows: usize, styles: &StyleConfig) -> [f32; 2] {
    let margins = &styles.margins;
    let content_height = num_rows as f32 * ROW_HEIGHT + HEADER_FOOTER_HEIGHT;

    let total_width = table_width + (margins.left + margins.right) * POINTS_PER_INCH;
    let total_height = content_height + (margins.top + margins.bottom) * POINTS_PER_INCH;

    let min = styles.min_page_size.unwrap_or(LETTER);
    let max = styles
        .max_page_size
        .unwrap_or([LETTER[0] * 2.0, LETTER[1] * 2.0]);

    let width = total_width.min(max[0]).max(min[0]);
    let height = if styles.paginate {
        total_height.min(max[1]).max(min[1])
    } else {
        total_height.max(min[1])
    };
    [width, height]
}

/// Splits display rows `1..total_rows` into page chunks. The header (row 0)
/// is not part of any chunk; every page draws it.
pub fn paginate(total_rows: usize, per_page: usize, paginate: bool) -> Vec<Vec<usize>> {
    let data: Vec<usize> = (1..total_rows).collect();
    if data.is_empty() {
        return vec![Vec::new()];
    }
    if !paginate {
        return vec![data];
    }
    data.chunks(per_page.max(1)).map(|c| c.to_vec()).collect()
}

#[derive(Debug, Clone, Copy)]
struct PageGeometry {
    height: f32,
    margin_top: f32,
    margin_bottom: f32,
    table_left: f32,
}

impl PageGeometry {
    fn new(width: f32, height: f32, table_width: f32, styles: &StyleConfig) -> Self {
        let margins = &styles.margins;
        let left = margins.left * POINTS_PER_INCH;
        let frame_width = width - (margins.left + margins.right) * POINTS_PER_INCH;
        PageGeometry {
            height,
            margin_top: margins.top * POINTS_PER_INCH,
            margin_bottom: margins.bottom * POINTS_PER_INCH,
            table_left: left + ((frame_width - table_width) / 2.0).max(0.0),
        }
    }

    /// Data rows that fit under the repeated header.
    fn data_rows_per_page(&self) -> usize {
        let usable = self.height - self.margin_top - self.margin_bottom - HEADER_FOOTER_HEIGHT;
        let rows = (usable / ROW_HEIGHT).floor() as usize;
        rows.saturating_sub(1).max(1)
    }

    fn table_top(&self) -> f32 {
        self.height - self.margin_top
    }
}

/// Column widths in points.
fn column_widths(report: &PivotReport) -> Vec<f32> {
    column_char_widths(report)
        .into_iter()
        .map(|chars| text_width(chars) + 2.0 * CELL_PADDING)
        .collect()
}

fn text_width(chars: usize) -> f32 {
    chars as f32 * FONT_SIZE * AVG_GLYPH_WIDTH
}

// ============================================================================
// PAINTING
// ============================================================================

struct PagePainter<'a> {
    report: &'a PivotReport,
    styles: &'a StyleConfig,
    sheet: &'a StyleSheet,
    widths: &'a [f32],
    geometry: &'a PageGeometry,
}

impl PagePainter<'_> {
    /// Content operations for one page: the header plus `chunk`.
    fn paint(&self, chunk: &[usize]) -> Vec<Operation> {
        let mut ops = Vec::new();
        let rows: Vec<usize> = std::iter::once(0).chain(chunk.iter().copied()).collect();
        let first_data = chunk.first().copied();
        let last_data = chunk.last().copied().unwrap_or(0);

        for (slot, &row) in rows.iter().enumerate() {
            let mut x = self.geometry.table_left;
            for (col, &width) in self.widths.iter().enumerate() {
                let covering = self.report.spans.iter().find(|s| s.covers(col, row));

                let (source_row, span_rows) = match covering {
                    Some(span) if span.start_row == row || Some(row) == first_data => {
                        (span.start_row, span.end_row.min(last_data) - row + 1)
                    }
                    Some(_) => {
                        x += width;
                        continue;
                    }
                    None => (row, 1),
                };

                let top = self.geometry.table_top() - slot as f32 * ROW_HEIGHT;
                let height = span_rows as f32 * ROW_HEIGHT;
                let value = self.report.table.display_cell(source_row, col);
                let style = self.sheet.cell_style(self.report, source_row, col);
                let align = cell_alignment(self.report, self.styles, source_row, &value);

                paint_cell(&mut ops, x, top - height, width, height, &style);
                paint_text(&mut ops, x, top - height, width, height, &value, &style, align);
                x += width;
            }
        }
        ops
    }
}

fn paint_cell(ops: &mut Vec<Operation>, x: f32, y: f32, w: f32, h: f32, style: &CellStyle) {
    let [r, g, b] = style.background.to_unit_rgb();
    ops.push(Operation::new("rg", vec![Object::Real(r), Object::Real(g), Object::Real(b)]));
    ops.push(rect(x, y, w, h));
    ops.push(Operation::new("f", vec![]));

    ops.push(Operation::new("RG", vec![Object::Real(0.0), Object::Real(0.0), Object::Real(0.0)]));
    ops.push(Operation::new("w", vec![Object::Real(GRID_LINE_WIDTH)]));
    ops.push(rect(x, y, w, h));
    ops.push(Operation::new("S", vec![]));
}

#[allow(clippy::too_many_arguments)]
fn paint_text(
    ops: &mut Vec<Operation>,
    x: f32,
    y: f32,
    w: f32,
    h: f32,
    value: &CellValue,
    style: &CellStyle,
    align: TextAlign,
) {
    let text = value.display_value();
    if text.is_empty() {
        return;
    }

    let width = text_width(text.chars().count());
    let tx = match align {
        TextAlign::Right => x + w - CELL_PADDING - width,
        TextAlign::Center => x + (w - width) / 2.0,
        TextAlign::Left | TextAlign::General => x + CELL_PADDING,
    };
    let ty = y + h / 2.0 - FONT_SIZE * 0.35;
    let font = if style.bold { BOLD_FONT } else { REGULAR_FONT };
    let [r, g, b] = style.text_color.to_unit_rgb();

    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new(
        "Tf",
        vec![Object::Name(font.to_vec()), Object::Real(FONT_SIZE)],
    ));
    ops.push(Operation::new("rg", vec![Object::Real(r), Object::Real(g), Object::Real(b)]));
    ops.push(Operation::new("Td", vec![Object::Real(tx), Object::Real(ty)]));
    ops.push(Operation::new(
        "Tj",
        vec![Object::String(win_ansi(&text), StringFormat::Literal)],
    ));
    ops.push(Operation::new("ET", vec![]));
}

fn rect(x: f32, y: f32, w: f32, h: f32) -> Operation {
    Operation::new(
        "re",
        vec![Object::Real(x), Object::Real(y), Object::Real(w), Object::Real(h)],
    )
}

/// Latin-1 bytes for the standard fonts; anything outside becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| if (c as u32) < 256 { c as u8 } else { b'?' })
        .collect()
}
