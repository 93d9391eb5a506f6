use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use loadwise::models::AthleteProfile;
use loadwise::synthetic::{SyntheticConfig, SyntheticHistoryGenerator};
use loadwise::{AnalyticsEngine, RunHistory, TssCalculator};

/// Performance benchmarks for the assessment pipeline
///
/// These benchmarks measure assessment cost across history sizes and the
/// parallel batch path across athlete counts.

fn end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 9, 30).unwrap()
}

fn create_history(days: usize, seed: u64) -> RunHistory {
    SyntheticHistoryGenerator::with_config(SyntheticConfig {
        rest_day_probability: 0.0,
        ..SyntheticConfig::default()
    })
    .generate_seeded(days, end_date(), seed)
}

fn bench_tss_series(c: &mut Criterion) {
    let calculator = TssCalculator::new();
    let mut group = c.benchmark_group("TSS Series");

    for &days in &[7, 42, 365] {
        let records = create_history(days, 1).newest_first();

        group.throughput(Throughput::Elements(days as u64));
        group.bench_with_input(BenchmarkId::new("series", days), &records, |b, records| {
            b.iter(|| calculator.series(black_box(records)));
        });
    }

    group.finish();
}

fn bench_assessment(c: &mut Criterion) {
    let engine = AnalyticsEngine::new();
    let profile = AthleteProfile::from_strings("Intermediate", "40-49");
    let mut group = c.benchmark_group("Assessment");

    // Test different history sizes
    for &days in &[1, 7, 42, 365, 1000] {
        let records = create_history(days, 7).newest_first();

        group.throughput(Throughput::Elements(days as u64));
        group.bench_with_input(BenchmarkId::new("assess", days), &records, |b, records| {
            b.iter(|| engine.assess(black_box(records), black_box(&profile)));
        });
    }

    group.finish();
}

fn bench_batch_assessment(c: &mut Criterion) {
    let engine = AnalyticsEngine::new();
    let mut group = c.benchmark_group("Batch Assessment");
    group.sample_size(20);

    for &athletes in &[10, 100, 1000] {
        let inputs: Vec<(RunHistory, AthleteProfile)> = (0..athletes)
            .map(|i| (create_history(90, i as u64), AthleteProfile::default()))
            .collect();

        group.throughput(Throughput::Elements(athletes as u64));
        group.bench_with_input(
            BenchmarkId::new("assess_batch", athletes),
            &inputs,
            |b, inputs| {
                b.iter(|| engine.assess_batch(black_box(inputs)));
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_tss_series,
    bench_assessment,
    bench_batch_assessment
);
criterion_main!(benches);
