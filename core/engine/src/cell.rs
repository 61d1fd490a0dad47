//! FILENAME: core/engine/src/cell.rs
//! PURPOSE: Defines the scalar value held by one cell of a tabular record.
//! CONTEXT: Every loader produces `CellValue`s and every pipeline stage consumes
//! them. "Blank" (absent or empty string) is a first-class notion because the
//! outline and span logic is driven entirely by which cells are blank.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The literal marker placed in the first column of the grand-total row.
pub const GRAND_TOTAL_LABEL: &str = "Grand Total";

/// Represents the raw data within a cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    /// True for absent values and empty strings. NaN counts as absent.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            CellValue::Number(n) => n.is_nan(),
            CellValue::Boolean(_) => false,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) if !n.is_nan() => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// True when this cell holds the grand-total marker.
    pub fn is_grand_total_marker(&self) -> bool {
        self.as_text() == Some(GRAND_TOTAL_LABEL)
    }

    /// Infers a value from raw text the way delimited sources are read:
    /// blank stays blank, anything `f64` accepts becomes a number.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::Text(raw.to_string()),
        }
    }

    /// Returns the display value of the cell as a String.
    pub fn display_value(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => {
                if n.is_nan() {
                    String::new()
                } else if n.fract() == 0.0 && n.abs() < 1e15 {
                    // Format without unnecessary decimal places
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(b) => {
                if *b { "TRUE" } else { "FALSE" }.to_string()
            }
        }
    }

    /// Total order used for sorting group keys:
    /// Empty < Number < Text < Boolean, each variant ordered naturally.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        match (self, other) {
            (CellValue::Empty, CellValue::Empty) => Ordering::Equal,
            (CellValue::Empty, _) => Ordering::Less,
            (_, CellValue::Empty) => Ordering::Greater,

            (CellValue::Number(na), CellValue::Number(nb)) => {
                na.partial_cmp(nb).unwrap_or(Ordering::Equal)
            }
            (CellValue::Number(_), _) => Ordering::Less,
            (_, CellValue::Number(_)) => Ordering::Greater,

            (CellValue::Text(ta), CellValue::Text(tb)) => ta.cmp(tb),
            (CellValue::Text(_), _) => Ordering::Less,
            (_, CellValue::Text(_)) => Ordering::Greater,

            (CellValue::Boolean(ba), CellValue::Boolean(bb)) => ba.cmp(bb),
        }
    }

    /// Equality where both blank spellings (Empty and "") match each other.
    ///
    /// Non-blank values must share a variant: `Number(1.0)` and `Text("1")`
    /// differ here even though both display as `1`. Group keys follow the same
    /// rule, so a column mixing the two yields two rows that look alike.
    pub fn same_display(&self, other: &CellValue) -> bool {
        match (self.is_blank(), other.is_blank()) {
            (true, true) => true,
            (false, false) => self == other,
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_value())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_covers_empty_and_empty_string() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::text("").is_blank());
        assert!(CellValue::Number(f64::NAN).is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
        assert!(!CellValue::Boolean(false).is_blank());
    }

    #[test]
    fn infer_reads_numbers_and_text() {
        assert_eq!(CellValue::infer(""), CellValue::Empty);
        assert_eq!(CellValue::infer("  "), CellValue::Empty);
        assert_eq!(CellValue::infer("42"), CellValue::Number(42.0));
        assert_eq!(CellValue::infer("-1.5"), CellValue::Number(-1.5));
        assert_eq!(CellValue::infer("failed"), CellValue::text("failed"));
    }

    #[test]
    fn integral_numbers_display_without_decimals() {
        assert_eq!(CellValue::Number(3.0).display_value(), "3");
        assert_eq!(CellValue::Number(2.5).display_value(), "2.5");
        assert_eq!(CellValue::Boolean(true).display_value(), "TRUE");
    }

    #[test]
    fn ordering_puts_numbers_before_text() {
        let mut values = vec![
            CellValue::text("b"),
            CellValue::Number(10.0),
            CellValue::text("a"),
            CellValue::Number(2.0),
        ];
        values.sort_by(|a, b| a.compare(b));
        assert_eq!(
            values,
            vec![
                CellValue::Number(2.0),
                CellValue::Number(10.0),
                CellValue::text("a"),
                CellValue::text("b"),
            ]
        );
    }

    #[test]
    fn same_display_treats_blanks_alike() {
        assert!(CellValue::Empty.same_display(&CellValue::text("")));
        assert!(!CellValue::Empty.same_display(&CellValue::text("x")));
        assert!(CellValue::text("x").same_display(&CellValue::text("x")));
    }

    #[test]
    fn same_display_keeps_variants_apart() {
        assert!(!CellValue::Number(1.0).same_display(&CellValue::text("1")));
        assert_eq!(CellValue::Number(1.0).display_value(), CellValue::text("1").display_value());
    }
}
