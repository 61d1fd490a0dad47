//! FILENAME: core/pivot-engine/src/layout.rs
//! Layout/Span Resolver - row classification, merge spans and row styles.
//!
//! Everything here is a function of the displayed content only. The
//! classification deliberately does not look at the `LevelTag`s produced by
//! the Outline Formatter so that the two can be checked against each other.
//!
//! Row indices count the header as row 0.

use engine::CellValue;

use crate::view::{DisplayTable, RowClass, RowStyle, SpanInstruction};

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Classifies one displayed data row.
///
/// `group_width` is the number of leading group columns.
pub fn classify_row(row: &[CellValue], group_width: usize) -> RowClass {
    if row.iter().any(CellValue::is_grand_total_marker) {
        return RowClass::GrandTotal;
    }

    let groups = &row[..group_width.min(row.len())];
    let last_blank = groups.last().map_or(true, CellValue::is_blank);
    if !last_blank {
        return RowClass::Normal;
    }

    match groups.iter().rposition(|c| !c.is_blank()) {
        Some(p) => RowClass::Subtotal(p + 1),
        None => RowClass::Normal,
    }
}

/// Classifies every display row, header first.
pub fn classify_rows(table: &DisplayTable, group_width: usize) -> Vec<RowClass> {
    std::iter::once(RowClass::Header)
        .chain(table.rows.iter().map(|r| classify_row(r, group_width)))
        .collect()
}

// ============================================================================
// SPANS
// ============================================================================

/// What a row means for the span scan of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellRole {
    /// Ends any run; nothing can start here.
    Barrier,
    /// Ends any run and starts a new anchor when non-blank.
    Anchor,
    /// Joins the current run when blank, anchors otherwise.
    Plain,
}

fn cell_role(class: RowClass, column: usize) -> CellRole {
    match class {
        RowClass::Header | RowClass::GrandTotal => CellRole::Barrier,
        RowClass::Subtotal(level) => {
            let label_col = level.saturating_sub(1);
            if column == label_col {
                CellRole::Anchor
            } else if column > label_col {
                CellRole::Barrier
            } else {
                CellRole::Plain
            }
        }
        RowClass::Normal => CellRole::Plain,
    }
}

/// Scan state for one column.
#[derive(Debug, Clone, Copy)]
enum ScanState {
    Idle,
    /// `anchor` shows the value; `last` is the latest blank joined to it.
    Accumulating { anchor: usize, last: usize },
    /// Anchor seen, no blank joined yet.
    Anchored { anchor: usize },
}

/// Computes vertical merge spans for the group columns.
///
/// For each group column, a non-blank cell followed by a run of blank cells
/// becomes one span covering the value and the run. Special rows end runs
/// in the columns at or right of their own level; a subtotal's label cell
/// may itself anchor a span. The aggregate column is never spanned.
pub fn compute_spans(table: &DisplayTable, dynamic_cols: &[String]) -> Vec<SpanInstruction> {
    let group_width = dynamic_cols.len().saturating_sub(1);
    let classes = classify_rows(table, group_width);
    let mut spans = Vec::new();

    for column in 0..group_width {
        let mut state = ScanState::Idle;

        for (display_row, class) in classes.iter().enumerate() {
            let blank = table.display_cell(display_row, column).is_blank();

            state = match (cell_role(*class, column), blank) {
                (CellRole::Barrier, _) => {
                    flush(state, column, &mut spans);
                    ScanState::Idle
                }
                (CellRole::Anchor, _) | (CellRole::Plain, false) => {
                    flush(state, column, &mut spans);
                    if blank {
                        ScanState::Idle
                    } else {
                        ScanState::Anchored { anchor: display_row }
                    }
                }
                (CellRole::Plain, true) => match state {
                    ScanState::Idle => ScanState::Idle,
                    ScanState::Anchored { anchor } | ScanState::Accumulating { anchor, .. } => {
                        ScanState::Accumulating { anchor, last: display_row }
                    }
                },
            };
        }
        flush(state, column, &mut spans);
    }

    spans
}

fn flush(state: ScanState, column: usize, spans: &mut Vec<SpanInstruction>) {
    if let ScanState::Accumulating { anchor, last } = state {
        if last > anchor {
            spans.push(SpanInstruction {
                column,
                start_row: anchor,
                end_row: last,
            });
        }
    }
}

// ============================================================================
// STYLES
// ============================================================================

/// One style instruction per display row, header first.
pub fn row_styles(classes: &[RowClass]) -> Vec<RowStyle> {
    classes
        .iter()
        .enumerate()
        .map(|(row, class)| RowStyle {
            row,
            class: *class,
            start_col: match class {
                RowClass::Subtotal(k) => k.saturating_sub(1),
                _ => 0,
            },
        })
        .collect()
}
