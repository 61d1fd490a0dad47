//! FILENAME: core/pivot-engine/src/lib.rs
//! Subtotal report subsystem.
//!
//! This crate turns a flat source table into an outline-form subtotal report.
//! It depends on `engine` only for shared types (CellValue, Table, styles).
//!
//! Layers:
//! - `definition`: Serializable configuration (what the report IS)
//! - `cache`: Hashable group keys and row grouping (HOW we group)
//! - `aggregate` / `subtotal` / `outline` / `layout`: the pipeline stages
//! - `view`: Renderable output for the renderers (WHAT we display)
//! - `pipeline`: The pipeline driver

pub mod definition;
pub mod cache;
pub mod error;
pub mod aggregate;
pub mod subtotal;
pub mod outline;
pub mod layout;
pub mod view;
pub mod pipeline;

pub use definition::*;
pub use cache::{GroupIndex, GroupKey, KeyValue, OrderedFloat};
pub use error::{ColumnRole, PivotError};
pub use view::*;
pub use aggregate::aggregate;
pub use subtotal::add_totals;
pub use outline::{blank_repeats, format_outline};
pub use layout::{classify_row, classify_rows, compute_spans, row_styles};
pub use pipeline::{calculate_report, check_levels};
