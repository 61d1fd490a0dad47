//! FILENAME: core/pivot-engine/src/subtotal.rs
//! Subtotal Engine - interleaves level subtotals with leaf rows.
//!
//! Given the aggregated table (group columns + aggregate column), produces a
//! depth-first sequence: each partition's subtotal row precedes the
//! partition's own rows, and a single grand-total row closes the table.

use log::debug;
use engine::{CellValue, Row, Table, GRAND_TOTAL_LABEL};

use crate::error::{ColumnRole, PivotError};

/// Adds subtotal rows for each prefix level in `subtotal_cols` and a final
/// grand-total row. The aggregate column is moved to the end.
pub fn add_totals(
    aggregated: &Table,
    subtotal_cols: &[String],
    agg_col: &str,
) -> Result<Table, PivotError> {
    if !aggregated.has_column(agg_col) {
        return Err(PivotError::schema(
            ColumnRole::Aggregate,
            vec![agg_col.to_string()],
        ));
    }
    let missing = aggregated.missing_columns(subtotal_cols);
    if !missing.is_empty() {
        return Err(PivotError::schema(ColumnRole::Subtotal, missing));
    }

    let group_cols: Vec<String> = aggregated
        .columns
        .iter()
        .filter(|c| c.as_str() != agg_col)
        .cloned()
        .collect();

    if group_cols.is_empty() {
        return Err(PivotError::InvalidConfig(
            "aggregated table has no group columns".to_string(),
        ));
    }
    if subtotal_cols.len() >= group_cols.len() || group_cols[..subtotal_cols.len()] != *subtotal_cols {
        return Err(PivotError::InvalidConfig(format!(
            "subtotal columns {:?} must be a leading prefix of group columns {:?} (excluding the last)",
            subtotal_cols, group_cols
        )));
    }

    let mut order = group_cols.clone();
    order.push(agg_col.to_string());
    let source = aggregated.reorder_columns(&order);
    let agg_idx = group_cols.len();

    let grand_total = sum_column(source.rows.iter(), agg_idx);

    let mut out = Table::new(source.columns.clone());
    let all: Vec<&Row> = source.rows.iter().collect();
    emit_partitions(&all, 0, subtotal_cols.len(), agg_idx, &mut out);
    out.push_row(grand_total_row(out.column_count(), agg_idx, grand_total));

    debug!(
        "add_totals: {} leaf rows -> {} rows over {} subtotal levels, grand total {}",
        source.row_count(),
        out.row_count(),
        subtotal_cols.len(),
        grand_total
    );

    Ok(out)
}

/// Sum of the numeric cells of the aggregate column over `rows`.
pub fn sum_column<'a, I>(rows: I, col: usize) -> f64
where
    I: Iterator<Item = &'a Row>,
{
    rows.filter_map(|r| r.get(col).and_then(CellValue::as_number)).sum()
}

/// Total of the aggregate column over the leaf rows of a leveled table.
pub fn grand_total(leveled: &Table, agg_col: &str) -> Option<f64> {
    let col = leveled.column_index(agg_col)?;
    leveled
        .rows
        .iter()
        .rev()
        .find(|r| r.iter().any(CellValue::is_grand_total_marker))
        .and_then(|r| r[col].as_number())
}

// ============================================================================
// RECURSION
// ============================================================================

fn emit_partitions(rows: &[&Row], level: usize, depth: usize, agg_idx: usize, out: &mut Table) {
    if level >= depth {
        for row in rows {
            out.push_row((*row).clone());
        }
        return;
    }

    for partition in partition_by(rows, level) {
        let subtotal = sum_column(partition.iter().copied(), agg_idx);
        let mut row: Row = vec![CellValue::text(""); agg_idx + 1];
        for col in 0..=level {
            row[col] = partition[0][col].clone();
        }
        row[agg_idx] = CellValue::Number(subtotal);
        out.push_row(row);

        emit_partitions(&partition, level + 1, depth, agg_idx, out);
    }
}

/// Splits rows by the value in `col`, children ordered ascending by that
/// value. Rows keep their relative order within a partition.
fn partition_by<'a>(rows: &[&'a Row], col: usize) -> Vec<Vec<&'a Row>> {
    let mut parts: Vec<Vec<&'a Row>> = Vec::new();
    for row in rows {
        match parts.iter_mut().find(|p| p[0][col] == row[col]) {
            Some(part) => part.push(row),
            None => parts.push(vec![row]),
        }
    }
    parts.sort_by(|a, b| a[0][col].compare(&b[0][col]));
    parts
}

fn grand_total_row(width: usize, agg_idx: usize, total: f64) -> Row {
    let mut row: Row = vec![CellValue::text(""); width];
    row[0] = CellValue::text(GRAND_TOTAL_LABEL);
    row[agg_idx] = CellValue::Number(total);
    row
}
