//! FILENAME: app/src/config.rs
// PURPOSE: The report configuration file and the interactive prompts.
// CONTEXT: A config file holds a `data` block (what to aggregate) and a
// `styles` block (how to render). Only key existence is checked up front.

use std::io::{BufRead, Write};
use std::path::Path;
use engine::{CellValue, StyleConfig};
use persistence::json_to_cell;
use pivot_engine::{AggregationType, PivotDefinition};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_FILE: &str = "config/config.json";

/// Source path key; required for file runs only.
pub const SOURCE_KEY: &str = "csv_file_path";

/// Keys every `data` block must have.
pub const DATA_KEYS: [&str; 5] = ["filters", "group_cols", "agg_func", "agg_col", "subtotal_col"];

// ============================================================================
// TYPES
// ============================================================================

/// The `data` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default)]
    pub csv_file_path: Option<String>,

    /// Column -> required value.
    #[serde(default)]
    pub filters: Map<String, Value>,

    #[serde(deserialize_with = "one_or_many")]
    pub group_cols: Vec<String>,

    pub agg_func: String,

    pub agg_col: String,

    #[serde(deserialize_with = "one_or_many")]
    pub subtotal_col: Vec<String>,
}

/// A whole configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub data: DataConfig,
    #[serde(default)]
    pub styles: StyleConfig,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// Accepts `"a,b"` or `["a", "b"]`; entries are trimmed and empty ones
/// dropped.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => s.split(',').map(str::to_string).collect(),
        OneOrMany::Many(v) => v,
    };
    Ok(clean_list(raw))
}

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl DataConfig {
    /// Filters as typed cell values, in file order.
    pub fn filter_values(&self) -> Vec<(String, CellValue)> {
        self.filters
            .iter()
            .map(|(column, value)| (column.clone(), json_to_cell(value)))
            .collect()
    }

    /// Builds the pipeline definition. Fails on an unknown aggregation name.
    pub fn to_definition(&self) -> Result<PivotDefinition, ConfigError> {
        let aggregation: AggregationType = self
            .agg_func
            .parse()
            .map_err(|e: pivot_engine::PivotError| ConfigError::Invalid(e.to_string()))?;

        Ok(PivotDefinition {
            filters: self.filter_values(),
            group_cols: self.group_cols.clone(),
            aggregation,
            agg_col: self.agg_col.clone(),
            subtotal_cols: self.subtotal_col.clone(),
        })
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Reads a config file as raw JSON.
pub fn read_config(path: &Path) -> Result<Value, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Lists every required key absent from `raw`, as dotted paths.
pub fn missing_keys(raw: &Value, require_source: bool) -> Vec<String> {
    let mut missing = Vec::new();

    match raw.get("data").and_then(Value::as_object) {
        Some(data) => {
            if require_source && !data.contains_key(SOURCE_KEY) {
                missing.push(format!("data.{}", SOURCE_KEY));
            }
            for key in DATA_KEYS {
                if !data.contains_key(key) {
                    missing.push(format!("data.{}", key));
                }
            }
        }
        None => missing.push("data".to_string()),
    }
    if raw.get("styles").is_none() {
        missing.push("styles".to_string());
    }
    missing
}

/// Checks key existence, then deserializes.
pub fn parse_config(raw: &Value, require_source: bool) -> Result<ReportConfig, ConfigError> {
    let missing = missing_keys(raw, require_source);
    if !missing.is_empty() {
        return Err(ConfigError::MissingKeys(missing));
    }
    Ok(serde_json::from_value(raw.clone())?)
}

pub fn load_config(path: &Path, require_source: bool) -> Result<ReportConfig, ConfigError> {
    parse_config(&read_config(path)?, require_source)
}

/// The `styles` block alone, defaulted when absent. Used by interactive runs,
/// which take their `data` block from the prompts.
pub fn styles_from(raw: &Value) -> Result<StyleConfig, ConfigError> {
    match raw.get("styles") {
        Some(styles) => Ok(serde_json::from_value(styles.clone())?),
        None => Ok(StyleConfig::default()),
    }
}

// ============================================================================
// INTERACTIVE
// ============================================================================

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> std::io::Result<String> {
    write!(output, "{}", prompt)?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn split_list(answer: &str) -> Vec<String> {
    clean_list(answer.split(',').map(str::to_string).collect())
}

/// Prompts for every `data` key. An empty filter answer means no filter.
pub fn prompt_data_config<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> std::io::Result<DataConfig> {
    let csv_file_path = ask(input, output, "Enter the CSV file path: ")?;
    let result_filter = ask(input, output, "Enter the result filter (e.g., 'failed'): ")?;
    let group_cols = ask(input, output, "Enter the group columns (comma-separated): ")?;
    let agg_func = ask(input, output, "Enter the aggregation function (e.g., 'count'): ")?;
    let agg_col = ask(input, output, "Enter the aggregation column name: ")?;
    let subtotal_col = ask(input, output, "Enter the subtotal columns (comma-separated): ")?;

    let mut filters = Map::new();
    if !result_filter.is_empty() {
        filters.insert("result".to_string(), Value::String(result_filter));
    }

    Ok(DataConfig {
        csv_file_path: Some(csv_file_path),
        filters,
        group_cols: split_list(&group_cols),
        agg_func,
        agg_col,
        subtotal_col: split_list(&subtotal_col),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "data": {
                "csv_file_path": "data/tests.csv",
                "filters": {"result": "failed"},
                "group_cols": ["suite", "test"],
                "agg_func": "count",
                "agg_col": "Count",
                "subtotal_col": ["suite"]
            },
            "styles": {
                "colors": {"subtotal_1": {"background": "DDEBF7", "text": "000000"}},
                "paginate": false
            }
        })
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(&sample(), true).unwrap();
        assert_eq!(config.data.group_cols, vec!["suite", "test"]);
        assert!(!config.styles.paginate);

        let def = config.data.to_definition().unwrap();
        assert_eq!(def.aggregation, AggregationType::Count);
        assert_eq!(def.filters, vec![("result".to_string(), CellValue::text("failed"))]);
        assert_eq!(def.subtotal_cols, vec!["suite"]);
    }

    #[test]
    fn test_all_missing_keys_reported_together() {
        let raw = json!({"data": {"group_cols": ["a"], "agg_col": "v"}});
        match parse_config(&raw, true).unwrap_err() {
            ConfigError::MissingKeys(keys) => assert_eq!(
                keys,
                vec![
                    "data.csv_file_path",
                    "data.filters",
                    "data.agg_func",
                    "data.subtotal_col",
                    "styles",
                ]
            ),
            other => panic!("expected MissingKeys, got {:?}", other),
        }
    }

    #[test]
    fn test_source_key_optional_for_payload_runs() {
        let mut raw = sample();
        raw["data"].as_object_mut().unwrap().remove("csv_file_path");
        assert!(parse_config(&raw, false).is_ok());
        assert!(parse_config(&raw, true).is_err());
    }

    #[test]
    fn test_comma_separated_lists() {
        let mut raw = sample();
        raw["data"]["group_cols"] = json!("suite, test,");
        raw["data"]["subtotal_col"] = json!("");
        let config = parse_config(&raw, true).unwrap();
        assert_eq!(config.data.group_cols, vec!["suite", "test"]);
        assert!(config.data.subtotal_col.is_empty());
    }

    #[test]
    fn test_unknown_aggregation_is_invalid() {
        let mut raw = sample();
        raw["data"]["agg_func"] = json!("harmonic");
        let config = parse_config(&raw, true).unwrap();
        assert!(matches!(config.data.to_definition(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_interactive_prompts() {
        let answers = "data/x.csv\n\nsuite,test\nsum\nduration\nsuite\n";
        let mut input = answers.as_bytes();
        let mut output = Vec::new();
        let data = prompt_data_config(&mut input, &mut output).unwrap();

        assert_eq!(data.csv_file_path.as_deref(), Some("data/x.csv"));
        assert!(data.filters.is_empty());
        assert_eq!(data.group_cols, vec!["suite", "test"]);
        assert_eq!(data.agg_func, "sum");
        assert_eq!(data.subtotal_col, vec!["suite"]);
        assert!(String::from_utf8(output).unwrap().contains("Enter the CSV file path"));
    }

    #[test]
    fn test_styles_default_when_absent() {
        let styles = styles_from(&json!({})).unwrap();
        assert!(styles.paginate);
    }
}
