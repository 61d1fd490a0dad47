//! FILENAME: core/pivot-engine/src/definition.rs
//! Pivot Definition - The configuration of one report run.
//!
//! This module contains all the types needed to DESCRIBE a subtotal report:
//! which rows to keep, how to group them, how to aggregate each group and
//! which group levels get subtotal rows. These structures are:
//! - Built once per run from the configuration collaborator
//! - Immutable snapshots of user intent (stages only read them)

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use engine::CellValue;
use crate::error::PivotError;

/// Name of the aggregate column produced by `count`.
pub const COUNT_COLUMN: &str = "Count";

// ============================================================================
// AGGREGATION
// ============================================================================

/// Supported aggregation functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregationType {
    /// Group size; produces a single `Count` column.
    Count,
    Sum,
    Mean,
    Median,
    Min,
    Max,
    /// Sample standard deviation (n - 1).
    StdDev,
    /// Sample variance (n - 1).
    Var,
    Product,
    First,
    Last,
    /// Number of distinct non-blank values.
    CountUnique,
}

impl Default for AggregationType {
    fn default() -> Self {
        AggregationType::Count
    }
}

impl FromStr for AggregationType {
    type Err = PivotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" | "size" => Ok(AggregationType::Count),
            "sum" => Ok(AggregationType::Sum),
            "mean" | "average" | "avg" => Ok(AggregationType::Mean),
            "median" => Ok(AggregationType::Median),
            "min" => Ok(AggregationType::Min),
            "max" => Ok(AggregationType::Max),
            "std" | "stddev" => Ok(AggregationType::StdDev),
            "var" => Ok(AggregationType::Var),
            "prod" | "product" => Ok(AggregationType::Product),
            "first" => Ok(AggregationType::First),
            "last" => Ok(AggregationType::Last),
            "nunique" => Ok(AggregationType::CountUnique),
            other => Err(PivotError::InvalidConfig(format!(
                "unknown aggregation function '{}'",
                other
            ))),
        }
    }
}

impl AggregationType {
    /// Reduces the values of one column within one group.
    /// `Count` is the group size and ignores the values themselves.
    pub fn reduce(&self, values: &[&CellValue]) -> CellValue {
        let numbers: Vec<f64> = values.iter().filter_map(|v| v.as_number()).collect();

        match self {
            AggregationType::Count => CellValue::Number(values.len() as f64),
            AggregationType::Sum => CellValue::Number(numbers.iter().sum()),
            AggregationType::Product => CellValue::Number(numbers.iter().product()),
            AggregationType::Mean => {
                if numbers.is_empty() {
                    CellValue::Empty
                } else {
                    CellValue::Number(numbers.iter().sum::<f64>() / numbers.len() as f64)
                }
            }
            AggregationType::Median => median(numbers),
            AggregationType::Var => match sample_variance(&numbers) {
                Some(var) => CellValue::Number(var),
                None => CellValue::Empty,
            },
            AggregationType::StdDev => match sample_variance(&numbers) {
                Some(var) => CellValue::Number(var.sqrt()),
                None => CellValue::Empty,
            },
            AggregationType::Min => extreme(values, &numbers, Ordering::Less),
            AggregationType::Max => extreme(values, &numbers, Ordering::Greater),
            AggregationType::First => values
                .iter()
                .find(|v| !v.is_blank())
                .map(|v| (*v).clone())
                .unwrap_or(CellValue::Empty),
            AggregationType::Last => values
                .iter()
                .rev()
                .find(|v| !v.is_blank())
                .map(|v| (*v).clone())
                .unwrap_or(CellValue::Empty),
            AggregationType::CountUnique => {
                let mut distinct: Vec<&CellValue> = Vec::new();
                for value in values.iter().filter(|v| !v.is_blank()) {
                    if !distinct.iter().any(|d| *d == *value) {
                        distinct.push(value);
                    }
                }
                CellValue::Number(distinct.len() as f64)
            }
        }
    }
}

fn median(mut numbers: Vec<f64>) -> CellValue {
    if numbers.is_empty() {
        return CellValue::Empty;
    }
    numbers.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = numbers.len() / 2;
    if numbers.len() % 2 == 0 {
        CellValue::Number((numbers[mid - 1] + numbers[mid]) / 2.0)
    } else {
        CellValue::Number(numbers[mid])
    }
}

fn sample_variance(numbers: &[f64]) -> Option<f64> {
    if numbers.len() < 2 {
        return None;
    }
    let n = numbers.len() as f64;
    let mean = numbers.iter().sum::<f64>() / n;
    let sum_sq: f64 = numbers.iter().map(|x| (x - mean).powi(2)).sum();
    Some(sum_sq / (n - 1.0))
}

/// Min/max over numbers when there are any, otherwise over the value order.
fn extreme(values: &[&CellValue], numbers: &[f64], wanted: Ordering) -> CellValue {
    if !numbers.is_empty() {
        let pick = numbers.iter().copied().fold(numbers[0], |acc, x| {
            match x.partial_cmp(&acc) {
                Some(ord) if ord == wanted => x,
                _ => acc,
            }
        });
        return CellValue::Number(pick);
    }

    values
        .iter()
        .filter(|v| !v.is_blank())
        .fold(None::<&CellValue>, |acc, v| match acc {
            Some(best) if v.compare(best) != wanted => Some(best),
            _ => Some(v),
        })
        .cloned()
        .unwrap_or(CellValue::Empty)
}

/// What the Aggregator computes per group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSpec {
    pub func: AggregationType,

    /// Column to reduce. `None` reduces every non-group column.
    /// Ignored for `Count`.
    pub column: Option<String>,
}

impl AggregateSpec {
    pub fn count() -> Self {
        AggregateSpec {
            func: AggregationType::Count,
            column: None,
        }
    }

    pub fn of(func: AggregationType, column: impl Into<String>) -> Self {
        AggregateSpec {
            func,
            column: Some(column.into()),
        }
    }

    pub fn all_columns(func: AggregationType) -> Self {
        AggregateSpec { func, column: None }
    }
}

// ============================================================================
// MAIN DEFINITION STRUCT
// ============================================================================

/// The complete definition of one report run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotDefinition {
    /// Column -> required value. Rows must match all of them exactly.
    pub filters: Vec<(String, CellValue)>,

    /// Columns to group by, outermost first.
    pub group_cols: Vec<String>,

    /// The aggregation function.
    pub aggregation: AggregationType,

    /// Source column reduced by every function except `Count`.
    pub agg_col: String,

    /// Leading group columns that get subtotal rows.
    pub subtotal_cols: Vec<String>,
}

impl PivotDefinition {
    /// Creates a definition with no filters and no subtotals.
    pub fn new(group_cols: Vec<String>, aggregation: AggregationType, agg_col: impl Into<String>) -> Self {
        PivotDefinition {
            filters: Vec::new(),
            group_cols,
            aggregation,
            agg_col: agg_col.into(),
            subtotal_cols: Vec::new(),
        }
    }

    pub fn with_filter(mut self, column: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.filters.push((column.into(), value.into()));
        self
    }

    pub fn with_subtotals(mut self, subtotal_cols: Vec<String>) -> Self {
        self.subtotal_cols = subtotal_cols;
        self
    }

    /// The Aggregator request implied by this definition.
    pub fn aggregate_spec(&self) -> AggregateSpec {
        match self.aggregation {
            AggregationType::Count => AggregateSpec::count(),
            func => AggregateSpec::of(func, self.agg_col.clone()),
        }
    }

    /// Name of the aggregate column after aggregation. Counting always
    /// produces `Count`, whatever `agg_col` says.
    pub fn value_column(&self) -> &str {
        match self.aggregation {
            AggregationType::Count => COUNT_COLUMN,
            _ => &self.agg_col,
        }
    }

    /// Group columns followed by the aggregate column, in display order.
    pub fn dynamic_cols(&self) -> Vec<String> {
        let mut cols = self.group_cols.clone();
        cols.push(self.value_column().to_string());
        cols
    }
}
