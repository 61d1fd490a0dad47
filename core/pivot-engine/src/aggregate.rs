//! FILENAME: core/pivot-engine/src/aggregate.rs
//! Aggregator - filters rows, groups them and reduces each group.
//!
//! Output has one row per distinct group key, sorted ascending by key, with
//! the group columns followed by the aggregate column(s).

use log::debug;
use smallvec::SmallVec;
use engine::{CellValue, Table};

use crate::cache::{compare_keys, GroupIndex, GroupKey, KeyValue};
use crate::definition::{AggregateSpec, AggregationType, COUNT_COLUMN};
use crate::error::{ColumnRole, PivotError};

/// Filters, groups and aggregates `table`.
///
/// Schema checks run before any row is touched: filter columns first, then
/// group columns, then the explicit aggregation column.
pub fn aggregate(
    table: &Table,
    filters: &[(String, CellValue)],
    group_cols: &[String],
    spec: &AggregateSpec,
) -> Result<Table, PivotError> {
    if group_cols.is_empty() {
        return Err(PivotError::InvalidConfig(
            "at least one group column is required".to_string(),
        ));
    }

    let missing = table.missing_columns(filters.iter().map(|(c, _)| c));
    if !missing.is_empty() {
        return Err(PivotError::schema(ColumnRole::Filter, missing));
    }
    let missing = table.missing_columns(group_cols);
    if !missing.is_empty() {
        return Err(PivotError::schema(ColumnRole::Group, missing));
    }

    let group_idx = indices_of(table, group_cols);
    let value_cols = value_columns(table, group_cols, spec)?;
    check_output_columns(group_cols, spec)?;

    let filter_idx: Vec<(usize, &CellValue)> = filters
        .iter()
        .filter_map(|(c, v)| table.column_index(c).map(|i| (i, v)))
        .collect();

    // ------------------------------------------------------------------
    // Group the surviving rows
    // ------------------------------------------------------------------
    let mut index = GroupIndex::new();
    let mut kept = 0usize;

    for (row_idx, row) in table.rows.iter().enumerate() {
        if !filter_idx.iter().all(|(i, wanted)| row[*i] == **wanted) {
            continue;
        }
        kept += 1;

        if group_idx.iter().any(|&i| row[i].is_blank()) {
            continue;
        }

        let key: GroupKey = group_idx
            .iter()
            .map(|&i| KeyValue::from(&row[i]))
            .collect::<SmallVec<_>>();
        index.insert(key, row_idx);
    }

    debug!(
        "aggregate: {} of {} rows passed filters, {} groups",
        kept,
        table.row_count(),
        index.len()
    );

    let mut groups = index.into_groups();
    groups.sort_by(|(a, _), (b, _)| compare_keys(a, b));

    // ------------------------------------------------------------------
    // Reduce each group
    // ------------------------------------------------------------------
    let mut columns: Vec<String> = group_cols.to_vec();
    match &value_cols {
        ValueColumns::Count => columns.push(COUNT_COLUMN.to_string()),
        ValueColumns::Columns(cols) => {
            columns.extend(cols.iter().map(|&i| table.columns[i].clone()))
        }
    }

    let mut out = Table::new(columns);
    for (key, members) in groups {
        let mut row: Vec<CellValue> = key.iter().map(KeyValue::to_cell).collect();
        match &value_cols {
            ValueColumns::Count => row.push(CellValue::Number(members.len() as f64)),
            ValueColumns::Columns(cols) => {
                for &col in cols {
                    let values: Vec<&CellValue> =
                        members.iter().map(|&r| &table.rows[r][col]).collect();
                    row.push(spec.func.reduce(&values));
                }
            }
        }
        out.push_row(row);
    }

    Ok(out)
}

enum ValueColumns {
    Count,
    Columns(Vec<usize>),
}

fn value_columns(
    table: &Table,
    group_cols: &[String],
    spec: &AggregateSpec,
) -> Result<ValueColumns, PivotError> {
    if spec.func == AggregationType::Count {
        return Ok(ValueColumns::Count);
    }

    match &spec.column {
        Some(name) => match table.column_index(name) {
            Some(i) => Ok(ValueColumns::Columns(vec![i])),
            None => Err(PivotError::schema(ColumnRole::Aggregate, vec![name.clone()])),
        },
        None => Ok(ValueColumns::Columns(
            (0..table.column_count())
                .filter(|&i| !group_cols.contains(&table.columns[i]))
                .collect(),
        )),
    }
}

/// The aggregated table must not repeat a column name: a group column may
/// appear once, and the value column may not also be a group column.
fn check_output_columns(group_cols: &[String], spec: &AggregateSpec) -> Result<(), PivotError> {
    for (i, name) in group_cols.iter().enumerate() {
        if group_cols[..i].contains(name) {
            return Err(PivotError::InvalidConfig(format!(
                "group column '{}' is listed more than once",
                name
            )));
        }
    }

    let value_col = if spec.func == AggregationType::Count {
        Some(COUNT_COLUMN)
    } else {
        spec.column.as_deref()
    };
    match value_col {
        Some(name) if group_cols.iter().any(|g| g == name) => Err(PivotError::InvalidConfig(
            format!("aggregate column '{}' is also a group column", name),
        )),
        _ => Ok(()),
    }
}

fn indices_of(table: &Table, names: &[String]) -> Vec<usize> {
    names
        .iter()
        .filter_map(|n| table.column_index(n))
        .collect()
}
