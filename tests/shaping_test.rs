//! Shaping function tests
//!
//! A recording renderer captures exactly what the shaping layer hands off, so
//! the tests can check validation order and series/name alignment.

use std::cell::RefCell;
use std::sync::Arc;
use trueno_analytics::record::{ArtifactContent, ArtifactRecord};
use trueno_analytics::store::MemoryStore;
use trueno_analytics::{
    Analytics, DistributionOptions, Error, IndicatorId, Noise, Renderer, Result, ScatterOptions,
    Series,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Density {
        names: Vec<String>,
        rows: Vec<usize>,
        levels: usize,
    },
    Scatter {
        names: Vec<String>,
        x_name: String,
        x_rows: usize,
        noise: Option<Noise>,
    },
}

#[derive(Default)]
struct RecordingRenderer {
    calls: RefCell<Vec<Call>>,
}

impl Renderer for RecordingRenderer {
    type Chart = usize;

    fn density(
        &self,
        series: &[Arc<Series>],
        names: &[String],
        options: &DistributionOptions,
    ) -> Result<usize> {
        self.calls.borrow_mut().push(Call::Density {
            names: names.to_vec(),
            rows: series.iter().map(|s| s.len()).collect(),
            levels: options.levels,
        });
        Ok(series.len())
    }

    fn scatter(
        &self,
        series: &[Arc<Series>],
        names: &[String],
        x: &Series,
        x_name: &str,
        options: &ScatterOptions,
    ) -> Result<usize> {
        self.calls.borrow_mut().push(Call::Scatter {
            names: names.to_vec(),
            x_name: x_name.to_string(),
            x_rows: x.len(),
            noise: options.noise,
        });
        Ok(series.len())
    }
}

/// run-A and run-B both log train_loss; run-A also logs valid_loss and a
/// text artifact; run-B has an indicator that never flushed a point.
fn analytics() -> Analytics {
    let store = MemoryStore::new();
    for step in 0..4 {
        store.log_scalar("run-A", "train_loss", step, 1.0 / (step as f64 + 1.0));
        store.log_scalar("run-A", "valid_loss", step, 1.5 / (step as f64 + 1.0));
        store.log_scalar("run-B", "train_loss", step, 2.0 / (step as f64 + 1.0));
    }
    store.log_histogram("run-B", "never_flushed", 0, &[]);
    store.log_artifact(ArtifactRecord::new(
        "run-A",
        "samples",
        3,
        ArtifactContent::Text("the quick brown fox".into()),
    ));
    Analytics::builder().memory_store(store).build().unwrap()
}

// =============================================================================
// distribution
// =============================================================================

#[test]
fn test_distribution_empty_collection_never_renders() {
    let analytics = analytics();
    let renderer = RecordingRenderer::default();
    let empty = analytics.runs(["run-A"]).unwrap().get("missing");

    let result = analytics.distribution(&renderer, &empty, &DistributionOptions::default());

    assert!(matches!(result, Err(Error::NoSeries)));
    assert!(renderer.calls.borrow().is_empty());
}

#[test]
fn test_distribution_one_series() {
    let analytics = analytics();
    let renderer = RecordingRenderer::default();
    let valid = analytics.runs(["run-A"]).unwrap().get("valid_loss");

    let options = DistributionOptions {
        levels: 3,
        ..DistributionOptions::default()
    };
    let chart = analytics.distribution(&renderer, &valid, &options).unwrap();

    assert_eq!(chart, 1);
    assert_eq!(
        renderer.calls.borrow()[0],
        Call::Density {
            names: vec!["valid_loss".to_string()],
            rows: vec![4],
            levels: 3,
        }
    );
}

#[test]
fn test_distribution_skips_absent_series() {
    let analytics = analytics();
    let renderer = RecordingRenderer::default();
    let everything = analytics.runs(["run-A", "run-B"]).unwrap();

    analytics
        .distribution(&renderer, &everything, &DistributionOptions::default())
        .unwrap();

    // samples (artifact) and never_flushed are filtered out
    let calls = renderer.calls.borrow();
    let Call::Density { names, .. } = &calls[0] else {
        panic!("expected density call");
    };
    assert_eq!(names, &["train_loss", "valid_loss", "train_loss"]);
}

// =============================================================================
// scatter
// =============================================================================

#[test]
fn test_scatter_ambiguous_x_axis() {
    let analytics = analytics();
    let renderer = RecordingRenderer::default();
    let both = analytics.runs(["run-A", "run-B"]).unwrap();

    let result = analytics.scatter(
        &renderer,
        &both.get("valid_loss"),
        &both.get("train_loss"),
        &ScatterOptions::default(),
    );

    assert!(matches!(result, Err(Error::XAxisCardinality { found: 2 })));
    assert!(renderer.calls.borrow().is_empty());
}

#[test]
fn test_scatter_missing_x_axis() {
    let analytics = analytics();
    let renderer = RecordingRenderer::default();
    let both = analytics.runs(["run-A", "run-B"]).unwrap();

    let result = analytics.scatter(
        &renderer,
        &both.get("train_loss"),
        &both.get("never_flushed"),
        &ScatterOptions::default(),
    );
    assert!(matches!(result, Err(Error::XAxisCardinality { found: 0 })));
}

#[test]
fn test_scatter_empty_y() {
    let analytics = analytics();
    let renderer = RecordingRenderer::default();
    let run_a = analytics.runs(["run-A"]).unwrap();

    let result = analytics.scatter(
        &renderer,
        &run_a.get("samples"),
        &run_a.get("train_loss"),
        &ScatterOptions::default(),
    );
    assert!(matches!(result, Err(Error::NoSeries)));
}

#[test]
fn test_scatter_pairs_every_series_with_x() {
    let analytics = analytics();
    let renderer = RecordingRenderer::default();
    let both = analytics.runs(["run-A", "run-B"]).unwrap();

    let options = ScatterOptions {
        noise: Some(Noise { y: 0.1, x: 0.1 }),
        ..ScatterOptions::default()
    };
    let chart = analytics
        .scatter(
            &renderer,
            &both.get("train_loss"),
            &both.get("valid_loss"),
            &options,
        )
        .unwrap();

    assert_eq!(chart, 2);
    assert_eq!(
        renderer.calls.borrow()[0],
        Call::Scatter {
            names: vec!["train_loss".to_string(), "train_loss".to_string()],
            x_name: "valid_loss".to_string(),
            x_rows: 4,
            noise: Some(Noise { y: 0.1, x: 0.1 }),
        }
    );
}

// =============================================================================
// raw accessors
// =============================================================================

#[test]
fn test_indicator_data_shape() {
    let analytics = analytics();
    let train = analytics.runs(["run-A", "run-B"]).unwrap().get("train_loss");

    let data = analytics.indicator_data(&train).unwrap();
    assert_eq!(data.len(), 2);
    for (series, name) in data.iter() {
        assert_eq!(name, "train_loss");
        assert_eq!(series.shape(), (4, 10));
    }
}

#[test]
fn test_indicator_data_empty() {
    let analytics = analytics();
    let samples = analytics.runs(["run-A"]).unwrap().get("samples");
    assert!(matches!(
        analytics.indicator_data(&samples),
        Err(Error::NoSeries)
    ));
}

#[test]
fn test_artifact_data() {
    let analytics = analytics();
    let run_a = analytics.runs(["run-A"]).unwrap();

    let (artifacts, names) = analytics.artifact_data(&run_a).unwrap().into_parts();
    assert_eq!(names, ["samples"]);
    assert_eq!(
        artifacts[0][0].content(),
        &ArtifactContent::Text("the quick brown fox".into())
    );
}

#[test]
fn test_get_data_duplicate_keys_across_runs() {
    let analytics = analytics();
    let train = analytics.runs(["run-A", "run-B"]).unwrap().get("train_loss");

    let data = analytics.get_data(&train).unwrap();
    assert_eq!(data.len(), 2);

    let a = &data[&IndicatorId::new("run-A", "train_loss")];
    let b = &data[&IndicatorId::new("run-B", "train_loss")];
    assert_eq!(a[0], [0.0, 1.0]);
    assert_eq!(b[1], [1.0, 1.0]);
}
