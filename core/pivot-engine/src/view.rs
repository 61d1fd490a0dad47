//! FILENAME: core/pivot-engine/src/view.rs
//! Pivot View - The rendered output of a report run.
//!
//! This module contains the types produced by the outline and layout stages
//! and handed to renderers:
//! - `DisplayTable`: header names plus display-ready rows
//! - `LevelTag`: per-row outline level assigned before blanking
//! - `RowClass`: per-row classification recomputed from displayed content
//! - `SpanInstruction` / `RowStyle`: merge and styling instructions
//!
//! Row indices in instructions count the header as row 0.

use serde::{Deserialize, Serialize};
use engine::style::{
    DEFAULT_BUCKET, GRAND_TOTAL_BUCKET, HEADER_BUCKET, SUBTOTAL_BUCKET,
};
use engine::{CellValue, Row};

// ============================================================================
// ROW LEVELS
// ============================================================================

/// Outline level of a data row, assigned by the Outline Formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelTag {
    Leaf,
    /// Subtotal over the first `k` group columns (k >= 1).
    Subtotal(usize),
    /// Level 0.
    GrandTotal,
}

impl LevelTag {
    /// Numeric subtotal level: `Some(0)` for the grand total, `None` for leaves.
    pub fn level(&self) -> Option<usize> {
        match self {
            LevelTag::Leaf => None,
            LevelTag::Subtotal(k) => Some(*k),
            LevelTag::GrandTotal => Some(0),
        }
    }

    pub fn is_special(&self) -> bool {
        !matches!(self, LevelTag::Leaf)
    }

    /// The classification a correctly formatted row must receive.
    pub fn expected_class(&self) -> RowClass {
        match self {
            LevelTag::Leaf => RowClass::Normal,
            LevelTag::Subtotal(k) => RowClass::Subtotal(*k),
            LevelTag::GrandTotal => RowClass::GrandTotal,
        }
    }
}

/// Classification of a display row, recomputed from its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowClass {
    Header,
    Normal,
    Subtotal(usize),
    GrandTotal,
}

impl RowClass {
    /// Style bucket key for this row.
    pub fn style_key(&self) -> String {
        match self {
            RowClass::Header => HEADER_BUCKET.to_string(),
            RowClass::Normal => DEFAULT_BUCKET.to_string(),
            RowClass::Subtotal(k) => format!("{}_{}", SUBTOTAL_BUCKET, k),
            RowClass::GrandTotal => GRAND_TOTAL_BUCKET.to_string(),
        }
    }

    /// True for subtotal and grand-total rows.
    pub fn is_total(&self) -> bool {
        matches!(self, RowClass::Subtotal(_) | RowClass::GrandTotal)
    }
}

// ============================================================================
// INSTRUCTIONS
// ============================================================================

/// A vertical merge of `column` from `start_row` through `end_row` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpanInstruction {
    pub column: usize,
    pub start_row: usize,
    pub end_row: usize,
}

impl SpanInstruction {
    pub fn covers(&self, column: usize, row: usize) -> bool {
        self.column == column && row >= self.start_row && row <= self.end_row
    }

    pub fn overlaps(&self, other: &SpanInstruction) -> bool {
        self.column == other.column
            && self.start_row <= other.end_row
            && other.start_row <= self.end_row
    }
}

/// Styling for one display row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowStyle {
    pub row: usize,
    pub class: RowClass,
    /// First column the row colour applies to.
    pub start_col: usize,
}

impl RowStyle {
    pub fn bucket(&self) -> String {
        self.class.style_key()
    }
}

// ============================================================================
// DISPLAY TABLE
// ============================================================================

/// Header names plus display-ready data rows.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl DisplayTable {
    /// Number of display rows including the header.
    pub fn display_row_count(&self) -> usize {
        self.rows.len() + 1
    }

    /// Cell at a display position (row 0 is the header).
    pub fn display_cell(&self, row: usize, col: usize) -> CellValue {
        if row == 0 {
            return self
                .columns
                .get(col)
                .map(|c| CellValue::Text(c.clone()))
                .unwrap_or_default();
        }
        self.rows
            .get(row - 1)
            .and_then(|r| r.get(col))
            .cloned()
            .unwrap_or_default()
    }
}

/// Everything a renderer needs for one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotReport {
    pub table: DisplayTable,

    /// One tag per data row.
    pub levels: Vec<LevelTag>,

    pub spans: Vec<SpanInstruction>,

    /// One entry per display row, header first.
    pub row_styles: Vec<RowStyle>,

    /// Group columns followed by the aggregate column.
    pub dynamic_cols: Vec<String>,

    pub grand_total: f64,
}

impl PivotReport {
    /// The span anchored at a cell, if any.
    pub fn span_at(&self, column: usize, row: usize) -> Option<&SpanInstruction> {
        self.spans
            .iter()
            .find(|s| s.column == column && s.start_row == row)
    }

    /// True when the cell is covered by a span but is not its anchor.
    pub fn is_merged_away(&self, column: usize, row: usize) -> bool {
        self.spans
            .iter()
            .any(|s| s.covers(column, row) && s.start_row != row)
    }

    pub fn row_style(&self, row: usize) -> Option<&RowStyle> {
        self.row_styles.get(row)
    }
}
