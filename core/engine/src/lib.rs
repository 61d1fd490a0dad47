//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the shared data model.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod cell;
pub mod style;
pub mod table;

// Re-export commonly used types at the crate root
pub use cell::{CellValue, GRAND_TOTAL_LABEL};
pub use style::{
    AlignmentConfig, CellKind, CellStyle, Color, ColorPair, ContentAlignment, Margins,
    StyleConfig, StyleError, TextAlign,
};
pub use table::{Row, Table};
