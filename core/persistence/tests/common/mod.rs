//! FILENAME: tests/common/mod.rs
//! Shared fixtures for persistence integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use engine::{CellValue, Table};
use pivot_engine::{calculate_report, AggregationType, PivotDefinition, PivotReport};
use tempfile::TempDir;

pub fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Test results: suite, test, result, duration.
pub fn results_table() -> Table {
    let rows = [
        ("api", "login", "failed", 1.5),
        ("api", "login", "failed", 2.0),
        ("api", "logout", "passed", 0.5),
        ("api", "refresh", "failed", 3.0),
        ("ui", "render", "failed", 4.0),
        ("ui", "scroll", "failed", 1.0),
        ("ui", "scroll", "passed", 1.0),
    ];
    Table::from_rows(
        cols(&["suite", "test", "result", "duration"]),
        rows.iter()
            .map(|(suite, test, result, duration)| {
                vec![
                    CellValue::text(*suite),
                    CellValue::text(*test),
                    CellValue::text(*result),
                    CellValue::Number(*duration),
                ]
            })
            .collect(),
    )
}

/// Failed-test counts per suite and test, subtotalled by suite.
pub fn failed_counts_report() -> PivotReport {
    let definition = PivotDefinition::new(cols(&["suite", "test"]), AggregationType::Count, "Count")
        .with_filter("result", CellValue::text("failed"))
        .with_subtotals(cols(&["suite"]));
    calculate_report(&results_table(), &definition)
        .expect("pipeline")
        .expect("non-empty report")
}

/// A scratch directory plus a helper to drop files into it.
pub struct Scratch {
    pub dir: TempDir,
}

impl Scratch {
    pub fn new() -> Self {
        Scratch {
            dir: TempDir::new().expect("tempdir"),
        }
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }

    pub fn file_count(&self) -> usize {
        std::fs::read_dir(self.dir.path())
            .map(|entries| entries.flatten().filter(|e| e.path().is_file()).count())
            .unwrap_or(0)
    }
}
