//! Run cache benchmarks
//!
//! Toyota Way: Genchi Genbutsu (measure, don't guess)
//!
//! Compares a cold fetch (summarise samples from the store) against a warm
//! cache hit for histogram indicators of growing length.
//!
//! Run with: cargo bench --bench cache_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use trueno_analytics::store::MemoryStore;
use trueno_analytics::RunCache;

const SAMPLES_PER_STEP: usize = 256;

#[allow(clippy::cast_precision_loss)]
fn histogram_store(steps: u64) -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    for step in 0..steps {
        let samples: Vec<f64> = (0..SAMPLES_PER_STEP)
            .map(|i| (i as f64).sin() * step as f64)
            .collect();
        store.log_histogram("bench-run", "weights", step, &samples);
    }
    Arc::new(store)
}

fn bench_indicator_data(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicator_data");

    for steps in [100u64, 1_000, 10_000] {
        let store = histogram_store(steps);

        group.bench_with_input(BenchmarkId::new("cold", steps), &store, |b, store| {
            b.iter(|| {
                let cache = RunCache::new(store.clone());
                let run = cache.get_run("bench-run").unwrap();
                let weights = &run.indicators().as_slice()[0];
                black_box(cache.get_indicator_data(weights).unwrap())
            });
        });

        let cache = RunCache::new(store.clone());
        let run = cache.get_run("bench-run").unwrap();
        let weights = run.indicators().as_slice()[0].clone();
        cache.get_indicator_data(&weights).unwrap();

        group.bench_with_input(BenchmarkId::new("warm", steps), &weights, |b, weights| {
            b.iter(|| black_box(cache.get_indicator_data(black_box(weights)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_indicator_data);
criterion_main!(benches);
