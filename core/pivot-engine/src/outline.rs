//! FILENAME: core/pivot-engine/src/outline.rs
//! Outline Formatter - level tagging and repeated-value suppression.
//!
//! Takes the leveled table from the Subtotal Engine and produces the display
//! matrix a pivot table shows in outline form: a repeated leading value is
//! blanked once its parent level has already been shown. Each data row also
//! gets a `LevelTag` computed from the content BEFORE blanking.

use log::debug;
use engine::{CellValue, Row, Table};

use crate::error::{ColumnRole, PivotError};
use crate::view::{DisplayTable, LevelTag};

/// Formats `leveled` for display.
///
/// `dynamic_cols` are the group columns followed by the aggregate column;
/// any other column of `leveled` is dropped. The caller's table is not
/// modified.
pub fn format_outline(
    leveled: &Table,
    dynamic_cols: &[String],
) -> Result<(DisplayTable, Vec<LevelTag>), PivotError> {
    if dynamic_cols.len() < 2 {
        return Err(PivotError::InvalidConfig(
            "outline needs at least one group column and the aggregate column".to_string(),
        ));
    }
    let missing = leveled.missing_columns(dynamic_cols);
    if !missing.is_empty() {
        return Err(PivotError::schema(ColumnRole::Display, missing));
    }

    let working = leveled.reorder_columns(dynamic_cols);
    let group_width = dynamic_cols.len() - 1;

    let mut rows: Vec<Row> = working
        .rows
        .into_iter()
        .map(|row| row.into_iter().map(fill_blank).collect())
        .collect();

    let levels: Vec<LevelTag> = rows.iter().map(|r| tag_row(r, group_width)).collect();

    for (row, tag) in rows.iter_mut().zip(levels.iter()) {
        if *tag == LevelTag::GrandTotal {
            for cell in row[..group_width].iter_mut() {
                if !cell.is_grand_total_marker() {
                    *cell = CellValue::text("");
                }
            }
        } else if row[group_width].is_blank() {
            for cell in row[..group_width].iter_mut() {
                *cell = CellValue::text("");
            }
        }
    }

    blank_repeats(&mut rows, group_width);

    debug!(
        "format_outline: {} rows, {} subtotal rows",
        rows.len(),
        levels.iter().filter(|t| matches!(t, LevelTag::Subtotal(_))).count()
    );

    Ok((
        DisplayTable {
            columns: working.columns,
            rows,
        },
        levels,
    ))
}

/// Assigns the outline level of a row before any blanking.
pub fn tag_row(row: &[CellValue], group_width: usize) -> LevelTag {
    let width = (group_width + 1).min(row.len());
    if row[..width].iter().any(CellValue::is_grand_total_marker) {
        return LevelTag::GrandTotal;
    }

    let groups = &row[..group_width.min(row.len())];
    match groups.last() {
        Some(last) if !last.is_blank() => LevelTag::Leaf,
        Some(_) => {
            let prefix = groups.iter().take_while(|c| !c.is_blank()).count();
            if prefix >= 1 {
                LevelTag::Subtotal(prefix)
            } else {
                LevelTag::Leaf
            }
        }
        None => LevelTag::Leaf,
    }
}

/// Collapses repeated leading values in the first `group_width` columns.
///
/// A cell is blanked when it equals the cell above and every column to its
/// left also equals the row above. Grand-total markers are never blanked.
/// Comparisons use the rows as they were before this call, so running it
/// twice changes nothing further.
pub fn blank_repeats(rows: &mut [Row], group_width: usize) {
    let snapshot: Vec<Row> = rows.to_vec();

    for r in 1..rows.len() {
        let above = &snapshot[r - 1];
        let current = &snapshot[r];
        let width = group_width.min(current.len()).min(above.len());

        for i in 0..width {
            if current[i].is_blank()
                || current[i].is_grand_total_marker()
                || !current[i].same_display(&above[i])
            {
                continue;
            }
            let prefix_unchanged = (0..i).all(|j| current[j].same_display(&above[j]));
            if prefix_unchanged {
                rows[r][i] = CellValue::text("");
            }
        }
    }
}

fn fill_blank(cell: CellValue) -> CellValue {
    if cell.is_blank() {
        CellValue::text("")
    } else {
        cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn t(s: &str) -> CellValue {
        CellValue::text(s)
    }

    fn n(v: f64) -> CellValue {
        CellValue::Number(v)
    }

    #[test]
    fn test_repeated_prefix_is_blanked() {
        let table = Table::from_rows(
            cols(&["col1", "col2", "val"]),
            vec![
                vec![t("A"), t("x"), n(1.0)],
                vec![t("A"), t("y"), n(2.0)],
                vec![t("B"), t("z"), n(3.0)],
            ],
        );
        let (display, levels) = format_outline(&table, &cols(&["col1", "col2", "val"])).unwrap();
        assert_eq!(display.rows[0], vec![t("A"), t("x"), n(1.0)]);
        assert_eq!(display.rows[1], vec![t(""), t("y"), n(2.0)]);
        assert_eq!(display.rows[2], vec![t("B"), t("z"), n(3.0)]);
        assert_eq!(levels, vec![LevelTag::Leaf; 3]);
    }

    #[test]
    fn test_levels_tagged_before_blanking() {
        let table = Table::from_rows(
            cols(&["a", "b", "c", "v"]),
            vec![
                vec![t("P"), t(""), t(""), n(3.0)],
                vec![t("P"), t("p1"), t(""), n(3.0)],
                vec![t("P"), t("p1"), t("x"), n(3.0)],
                vec![t("Grand Total"), t(""), t(""), n(3.0)],
            ],
        );
        let (display, levels) = format_outline(&table, &cols(&["a", "b", "c", "v"])).unwrap();
        assert_eq!(
            levels,
            vec![
                LevelTag::Subtotal(1),
                LevelTag::Subtotal(2),
                LevelTag::Leaf,
                LevelTag::GrandTotal,
            ]
        );
        assert_eq!(display.rows[1], vec![t(""), t("p1"), t(""), n(3.0)]);
        assert_eq!(display.rows[2], vec![t(""), t(""), t("x"), n(3.0)]);
        assert_eq!(display.rows[3][0], t("Grand Total"));
    }

    #[test]
    fn test_blanking_is_idempotent() {
        let mut rows = vec![
            vec![t("X"), t(""), n(3.0)],
            vec![t("X"), n(1.0), n(2.0)],
            vec![t("X"), n(2.0), n(1.0)],
            vec![t("Y"), t(""), n(1.0)],
            vec![t("Y"), n(1.0), n(1.0)],
        ];
        blank_repeats(&mut rows, 2);
        let once = rows.clone();
        blank_repeats(&mut rows, 2);
        assert_eq!(rows, once);
        assert_eq!(rows[4], vec![t(""), n(1.0), n(1.0)]);
    }

    #[test]
    fn test_repeated_marker_is_kept() {
        let table = Table::from_rows(
            cols(&["a", "b", "v"]),
            vec![
                vec![t("Grand Total"), t(""), n(1.0)],
                vec![t("Grand Total"), t("x"), n(1.0)],
            ],
        );
        let (display, levels) = format_outline(&table, &cols(&["a", "b", "v"])).unwrap();
        assert_eq!(levels, vec![LevelTag::GrandTotal; 2]);
        assert_eq!(display.rows[1], vec![t("Grand Total"), t(""), n(1.0)]);
    }

    #[test]
    fn test_missing_values_become_empty_strings() {
        let table = Table::from_rows(
            cols(&["g", "v"]),
            vec![vec![t("A"), CellValue::Empty], vec![t("B"), n(f64::NAN)]],
        );
        let (display, _) = format_outline(&table, &cols(&["g", "v"])).unwrap();
        assert_eq!(display.rows[0], vec![t(""), t("")]);
        assert_eq!(display.rows[1], vec![t(""), t("")]);
    }

    #[test]
    fn test_input_table_is_untouched() {
        let table = Table::from_rows(
            cols(&["g", "v"]),
            vec![vec![t("A"), n(1.0)], vec![t("A"), n(2.0)]],
        );
        let before = table.clone();
        let _ = format_outline(&table, &cols(&["g", "v"])).unwrap();
        assert_eq!(table, before);
    }

    #[test]
    fn test_helper_columns_are_removed() {
        let table = Table::from_rows(
            cols(&["helper", "g", "v"]),
            vec![vec![n(9.0), t("A"), n(1.0)]],
        );
        let (display, _) = format_outline(&table, &cols(&["g", "v"])).unwrap();
        assert_eq!(display.columns, cols(&["g", "v"]));
        assert_eq!(display.rows[0], vec![t("A"), n(1.0)]);
    }

    #[test]
    fn test_unknown_dynamic_column_is_schema_error() {
        let table = Table::from_rows(cols(&["g", "v"]), vec![]);
        let err = format_outline(&table, &cols(&["g", "w"])).unwrap_err();
        assert!(err.is_schema_error());
    }
}
