//! Run Analysis: comparing indicators across training runs
//!
//! This demo logs two synthetic training runs into an in-memory store, then
//! walks the analysis flow end to end:
//! - resolve runs into one indicator collection
//! - select indicators by key and combine collections
//! - render percentile bands and a loss-vs-loss scatter as JSON tables
//!
//! Run with: cargo run --example run_analysis
//! Set `RUST_LOG=trueno_analytics=debug` to watch cache misses.

use trueno_analytics::logging::init_tracing;
use trueno_analytics::record::{ArtifactContent, ArtifactRecord};
use trueno_analytics::store::MemoryStore;
use trueno_analytics::{
    Analytics, AnalyticsConfig, DistributionOptions, Noise, ScatterOptions, TableRenderer,
};

#[allow(clippy::cast_precision_loss)]
fn log_run(store: &MemoryStore, run_id: &str, lr: f64) {
    for step in 0..20u64 {
        let t = step as f64;
        store.log_scalar(run_id, "train_loss", step, (-lr * t).exp());
        store.log_scalar(run_id, "valid_loss", step, (-lr * t).exp() * 1.1 + 0.05);
        let weights: Vec<f64> = (0..200)
            .map(|i| (f64::from(i) - 100.0) / (t + 10.0))
            .collect();
        store.log_histogram(run_id, "weights", step, &weights);
    }
    store.log_artifact(ArtifactRecord::new(
        run_id,
        "samples",
        19,
        ArtifactContent::Text(format!("{run_id}: generated text at lr={lr}")),
    ));
}

fn main() -> trueno_analytics::Result<()> {
    // RUST_LOG overrides the configured filter
    let config = AnalyticsConfig::default();
    init_tracing(&config.log_filter);

    println!("=== Trueno-Analytics Run Analysis ===\n");

    let store = MemoryStore::new();
    log_run(&store, "run-fast", 0.3);
    log_run(&store, "run-slow", 0.1);
    let analytics = Analytics::builder().memory_store(store).build()?;

    let runs = analytics.runs(["run-fast", "run-slow"])?;
    println!("Indicators across both runs: {}", runs.len());
    for key in runs.keys() {
        println!("  - {key}");
    }

    let losses = runs.get("train_loss") + runs.get("valid_loss");
    println!("\nLoss indicators selected: {}", losses.len());

    println!("\n=== Raw series ===");
    let data = analytics.indicator_data(&losses)?;
    for (series, name) in data.iter() {
        let (rows, cols) = series.shape();
        println!("  {name}: {rows} x {cols}");
    }

    println!("\n=== Weight distribution (3 levels) ===");
    let renderer = TableRenderer::with_seed(7);
    let options = DistributionOptions {
        levels: 3,
        ..DistributionOptions::default()
    };
    let chart = analytics.distribution(&renderer, &runs.get("weights"), &options)?;
    let layers = chart["layers"].as_array().map_or(0, Vec::len);
    println!("  Layers rendered: {layers}");

    println!("\n=== train_loss vs valid_loss of run-fast ===");
    let fast = analytics.get_run("run-fast")?;
    let scatter = analytics.scatter(
        &renderer,
        &runs.get("train_loss"),
        &fast.indicator("valid_loss"),
        &ScatterOptions {
            noise: Some(Noise { y: 0.01, x: 0.01 }),
            ..ScatterOptions::default()
        },
    )?;
    println!("{}", serde_json::to_string_pretty(&scatter["layers"][0]["values"][0])?);

    println!("\n=== Artifacts ===");
    let (artifacts, names) = analytics.artifact_data(&runs.get("samples"))?.into_parts();
    for (series, name) in artifacts.iter().zip(&names) {
        for record in series.iter() {
            println!("  {name}@{}: {:?}", record.step(), record.content());
        }
    }

    let stats = analytics.cache_stats();
    println!(
        "\nCache: {} hits, {} run loads, {} series loads",
        stats.hits, stats.run_loads, stats.series_loads
    );

    Ok(())
}
