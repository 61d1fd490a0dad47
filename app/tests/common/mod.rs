//! FILENAME: tests/common/mod.rs
//! Fixtures for report runner integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use app_lib::{parse_config, ReportConfig};
use serde_json::{json, Value};
use tempfile::TempDir;

/// A scratch directory holding one source file.
pub struct ReportHarness {
    pub dir: TempDir,
    pub source: PathBuf,
}

impl ReportHarness {
    /// Writes the sales fixture as `sales.csv`.
    pub fn with_sales_csv() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let source = dir.path().join("sales.csv");
        std::fs::write(&source, SalesFixture::csv()).expect("write csv");
        ReportHarness { dir, source }
    }

    /// Writes arbitrary CSV text.
    pub fn with_csv(text: &str) -> Self {
        let dir = TempDir::new().expect("tempdir");
        let source = dir.path().join("input.csv");
        std::fs::write(&source, text).expect("write csv");
        ReportHarness { dir, source }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Config for this harness' source with the given `data` overrides.
    pub fn config(&self, data: Value) -> ReportConfig {
        let mut raw = sales_config();
        raw["data"]["csv_file_path"] = json!(self.source.to_string_lossy());
        merge(&mut raw["data"], data);
        parse_config(&raw, true).expect("valid config")
    }

    /// Files in the harness directory with the given extension.
    pub fn files_with_extension(&self, ext: &str) -> Vec<PathBuf> {
        list_files(self.path(), ext)
    }
}

pub fn list_files(dir: &Path, ext: &str) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .flatten()
                .map(|e| e.path())
                .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(ext))
                .collect()
        })
        .unwrap_or_default()
}

fn merge(target: &mut Value, overrides: Value) {
    if let (Some(target), Value::Object(overrides)) = (target.as_object_mut(), overrides) {
        for (key, value) in overrides {
            target.insert(key, value);
        }
    }
}

/// Sum of sales by region and product, subtotalled by region.
pub fn sales_config() -> Value {
    json!({
        "data": {
            "filters": {},
            "group_cols": ["Region", "Product"],
            "agg_func": "sum",
            "agg_col": "Sales",
            "subtotal_col": ["Region"]
        },
        "styles": {
            "colors": {
                "header": {"background": "808080", "text": "F5F5F5"},
                "subtotal_1": {"background": "DDEBF7", "text": "000000"}
            }
        }
    })
}

// ============================================================================
// SAMPLE DATA
// ============================================================================

pub struct SalesFixture;

impl SalesFixture {
    pub fn headers() -> Vec<&'static str> {
        vec!["Region", "Product", "Quarter", "Sales", "Quantity"]
    }

    pub fn data() -> Vec<(&'static str, &'static str, &'static str, f64, f64)> {
        vec![
            ("North", "Widget", "Q1", 10000.0, 100.0),
            ("North", "Widget", "Q2", 12000.0, 120.0),
            ("North", "Gadget", "Q1", 8000.0, 80.0),
            ("North", "Gadget", "Q2", 9000.0, 90.0),
            ("South", "Widget", "Q1", 15000.0, 150.0),
            ("South", "Widget", "Q2", 14000.0, 140.0),
            ("South", "Gadget", "Q1", 11000.0, 110.0),
            ("South", "Gadget", "Q2", 13000.0, 130.0),
            ("East", "Widget", "Q1", 9000.0, 90.0),
            ("East", "Widget", "Q2", 11000.0, 110.0),
            ("East", "Gadget", "Q1", 7000.0, 70.0),
            ("East", "Gadget", "Q2", 8500.0, 85.0),
        ]
    }

    pub fn total_sales() -> f64 {
        Self::data().iter().map(|row| row.3).sum()
    }

    pub fn csv() -> String {
        let mut text = Self::headers().join(",");
        text.push('\n');
        for (region, product, quarter, sales, quantity) in Self::data() {
            text.push_str(&format!("{},{},{},{},{}\n", region, product, quarter, sales, quantity));
        }
        text
    }

    /// The same rows as a JSON array of records.
    pub fn json_rows() -> Value {
        Value::Array(
            Self::data()
                .into_iter()
                .map(|(region, product, quarter, sales, quantity)| {
                    json!({
                        "Region": region,
                        "Product": product,
                        "Quarter": quarter,
                        "Sales": sales,
                        "Quantity": quantity
                    })
                })
                .collect(),
        )
    }
}
