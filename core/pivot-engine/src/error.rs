//! FILENAME: core/pivot-engine/src/error.rs

use std::fmt;
use thiserror::Error;
use crate::view::{LevelTag, RowClass};

/// Which configuration list referenced a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Filter,
    Group,
    Aggregate,
    Subtotal,
    Display,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnRole::Filter => "Filter",
            ColumnRole::Group => "Group",
            ColumnRole::Aggregate => "Aggregate",
            ColumnRole::Subtotal => "Subtotal",
            ColumnRole::Display => "Display",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PivotError {
    #[error("{role} columns {missing:?} not found in data")]
    Schema {
        role: ColumnRole,
        missing: Vec<String>,
    },

    #[error("invalid pivot configuration: {0}")]
    InvalidConfig(String),

    #[error("row {row}: outline level {tagged:?} disagrees with display classification {classified:?}")]
    InconsistentLevels {
        row: usize,
        tagged: LevelTag,
        classified: RowClass,
    },
}

impl PivotError {
    pub fn schema(role: ColumnRole, missing: Vec<String>) -> Self {
        PivotError::Schema { role, missing }
    }

    pub fn is_schema_error(&self) -> bool {
        matches!(self, PivotError::Schema { .. })
    }
}
