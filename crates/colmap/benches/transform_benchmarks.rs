//! Transform and export performance benchmarks.
//!
//! Measures parsing, substitution, and serialization across dataset sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use colmap::{Decision, DecisionStore, Exporter, Parser, SelectedColumns, TransformEngine};

/// Generate a data dictionary with a field-name column and a label column.
fn generate_dictionary(rows: usize) -> String {
    let mut data = String::from("Variable / Field Name,Field Label,Notes\n");
    for row in 0..rows {
        data.push_str(&format!("field_{},Label {},note\n", row % 50, row));
    }
    data
}

/// Accept a mapping for every generated field name.
fn generate_decisions(keys: usize) -> DecisionStore {
    (0..keys)
        .map(|i| {
            (
                format!("field_{}", i),
                Decision {
                    accepted: i % 4 != 0,
                    selected_mapping: format!("normalized_field_{}", i),
                },
            )
        })
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_upload");

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_dictionary(*rows);
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &data, |b, data| {
            let parser = Parser::new();
            b.iter(|| parser.parse_upload("dict.csv", black_box(data.as_bytes())))
        });
    }

    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_decisions");
    let selected: SelectedColumns = ["Variable / Field Name"].into_iter().collect();
    let decisions = generate_decisions(50);
    let engine = TransformEngine::new();

    for rows in [100, 1_000, 10_000].iter() {
        let dataset = Parser::new()
            .parse_bytes(generate_dictionary(*rows).as_bytes())
            .expect("benchmark data should parse");

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &dataset, |b, dataset| {
            b.iter(|| engine.apply(black_box(dataset), &selected, &decisions))
        });
    }

    group.finish();
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_csv");
    let exporter = Exporter::default();

    for rows in [1_000, 10_000].iter() {
        let dataset = Parser::new()
            .parse_bytes(generate_dictionary(*rows).as_bytes())
            .expect("benchmark data should parse");

        group.throughput(Throughput::Elements(*rows as u64));
        group.bench_with_input(BenchmarkId::new("rows", rows), &dataset, |b, dataset| {
            b.iter(|| exporter.to_csv(black_box(dataset)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_apply, bench_export);
criterion_main!(benches);
