//! FILENAME: core/pivot-engine/src/pipeline.rs
//! Pivot Engine - The pipeline that turns source rows into a renderable report.
//!
//! This module takes a PivotDefinition (configuration) and a source Table
//! and produces a PivotReport (display table + rendering instructions).
//!
//! Algorithm:
//! 1. Aggregate: filter, group and reduce the source rows
//! 2. Add totals: interleave level subtotals and append the grand total
//! 3. Format outline: tag levels, then blank repeated leading values
//! 4. Resolve layout: classify displayed rows, verify them against the
//!    tags, compute merge spans and per-row styles

use log::{debug, warn};
use engine::Table;

use crate::aggregate::aggregate;
use crate::definition::PivotDefinition;
use crate::error::PivotError;
use crate::layout::{classify_rows, compute_spans, row_styles};
use crate::outline::format_outline;
use crate::subtotal::{add_totals, sum_column};
use crate::view::{LevelTag, PivotReport, RowClass};

/// Runs the full pipeline.
///
/// Returns `Ok(None)` when there is nothing to report: the source has no
/// rows, or no row survives filtering. That outcome is logged as a warning
/// and is not an error.
pub fn calculate_report(
    source: &Table,
    definition: &PivotDefinition,
) -> Result<Option<PivotReport>, PivotError> {
    if source.is_empty() {
        warn!("source table has no rows, nothing to report");
        return Ok(None);
    }

    let aggregated = aggregate(
        source,
        &definition.filters,
        &definition.group_cols,
        &definition.aggregate_spec(),
    )?;

    if aggregated.is_empty() {
        warn!(
            "no rows left after filtering {} source rows with {:?}, nothing to report",
            source.row_count(),
            definition.filters
        );
        return Ok(None);
    }

    let value_col = definition.value_column();
    let leveled = add_totals(&aggregated, &definition.subtotal_cols, value_col)?;

    let dynamic_cols = definition.dynamic_cols();
    let (table, levels) = format_outline(&leveled, &dynamic_cols)?;

    let group_width = dynamic_cols.len() - 1;
    let classes = classify_rows(&table, group_width);
    check_levels(&levels, &classes)?;

    let spans = compute_spans(&table, &dynamic_cols);
    let styles = row_styles(&classes);

    let grand_total = aggregated
        .column_index(value_col)
        .map(|col| sum_column(aggregated.rows.iter(), col))
        .unwrap_or(0.0);

    debug!(
        "calculate_report: {} display rows, {} spans, grand total {}",
        table.display_row_count(),
        spans.len(),
        grand_total
    );

    Ok(Some(PivotReport {
        table,
        levels,
        spans,
        row_styles: styles,
        dynamic_cols,
        grand_total,
    }))
}

/// Verifies that every data row's outline tag matches the classification
/// recomputed from its displayed content. `classes[0]` is the header.
pub fn check_levels(levels: &[LevelTag], classes: &[RowClass]) -> Result<(), PivotError> {
    for (i, tag) in levels.iter().enumerate() {
        let display_row = i + 1;
        let classified = classes.get(display_row).copied().unwrap_or(RowClass::Normal);
        if tag.expected_class() != classified {
            return Err(PivotError::InconsistentLevels {
                row: display_row,
                tagged: *tag,
                classified,
            });
        }
    }
    Ok(())
}
