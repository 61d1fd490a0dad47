//! FILENAME: core/pivot-engine/benches/pivot_calculations.rs
//! Benchmarks for the report pipeline.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use engine::{CellValue, Table};
use pivot_engine::{calculate_report, AggregationType, PivotDefinition};

const REGIONS: [&str; 4] = ["North", "South", "East", "West"];
const PRODUCTS: [&str; 6] = ["Widget", "Gadget", "Gizmo", "Doohickey", "Sprocket", "Flange"];

fn sales_table(rows: usize) -> Table {
    let columns = vec![
        "region".to_string(),
        "product".to_string(),
        "month".to_string(),
        "result".to_string(),
        "sales".to_string(),
    ];
    let data = (0..rows)
        .map(|i| {
            vec![
                CellValue::text(REGIONS[i % REGIONS.len()]),
                CellValue::text(PRODUCTS[(i / 3) % PRODUCTS.len()]),
                CellValue::Number(((i % 12) + 1) as f64),
                CellValue::text(if i % 5 == 0 { "failed" } else { "passed" }),
                CellValue::Number((i % 97) as f64 * 1.5),
            ]
        })
        .collect();
    Table::from_rows(columns, data)
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculate_report");
    let group_cols = vec!["region".to_string(), "product".to_string(), "month".to_string()];

    for rows in [1_000usize, 10_000, 100_000] {
        let table = sales_table(rows);

        let flat = PivotDefinition::new(group_cols.clone(), AggregationType::Sum, "sales");
        group.bench_with_input(BenchmarkId::new("no_subtotals", rows), &table, |b, t| {
            b.iter(|| calculate_report(black_box(t), black_box(&flat)))
        });

        let nested = PivotDefinition::new(group_cols.clone(), AggregationType::Count, "Count")
            .with_filter("result", "failed")
            .with_subtotals(vec!["region".to_string(), "product".to_string()]);
        group.bench_with_input(BenchmarkId::new("two_levels_filtered", rows), &table, |b, t| {
            b.iter(|| calculate_report(black_box(t), black_box(&nested)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
