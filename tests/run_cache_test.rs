//! Run cache tests
//!
//! Identity stability, at-most-once fetches (also under concurrent callers),
//! absent payload handling and explicit eviction.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use trueno_analytics::record::{ArtifactContent, ArtifactRecord, ArtifactSeries, RunRecord};
use trueno_analytics::store::{BackingStore, MemoryStore};
use trueno_analytics::{Error, Indicator, IndicatorKind, Result, RunCache, Series};

/// Store wrapper that counts every backing read.
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    run_reads: AtomicUsize,
    series_reads: AtomicUsize,
    artifact_reads: AtomicUsize,
    delay: Option<Duration>,
}

impl CountingStore {
    fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    fn pause(&self) {
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
    }
}

impl BackingStore for CountingStore {
    fn run_record(&self, run_id: &str) -> Result<Option<RunRecord>> {
        self.run_reads.fetch_add(1, Ordering::SeqCst);
        self.pause();
        self.inner.run_record(run_id)
    }

    fn list_indicators(&self, run_id: &str) -> Result<Vec<Indicator>> {
        self.inner.list_indicators(run_id)
    }

    fn fetch_series(&self, run_id: &str, key: &str) -> Result<Option<Series>> {
        self.series_reads.fetch_add(1, Ordering::SeqCst);
        self.pause();
        self.inner.fetch_series(run_id, key)
    }

    fn fetch_artifacts(&self, run_id: &str, key: &str) -> Result<Option<ArtifactSeries>> {
        self.artifact_reads.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_artifacts(run_id, key)
    }
}

fn populated(store: CountingStore) -> Arc<CountingStore> {
    for step in 0..5 {
        store.inner.log_scalar("run-1", "loss", step, 1.0);
        store.inner.log_histogram("run-1", "weights", step, &[-1.0, 0.0, 1.0]);
    }
    store.inner.log_artifact(ArtifactRecord::new(
        "run-1",
        "samples",
        4,
        ArtifactContent::Text("generated".into()),
    ));
    Arc::new(store)
}

#[test]
fn test_get_run_identity_and_single_fetch() {
    let store = populated(CountingStore::default());
    let cache = RunCache::new(store.clone());

    let first = cache.get_run("run-1").unwrap();
    let second = cache.get_run("run-1").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(store.run_reads.load(Ordering::SeqCst), 1);
    assert_eq!(first.indicators().len(), 3);
    assert_eq!(first.indicator("weights").as_slice()[0].kind(), IndicatorKind::Histogram);
}

#[test]
fn test_get_run_unknown() {
    let cache = RunCache::new(populated(CountingStore::default()));
    let err = cache.get_run("run-404").unwrap_err();
    assert!(matches!(err, Error::RunNotFound(ref id) if id == "run-404"));
    assert!(err.to_string().contains("Run not found"));
}

#[test]
fn test_series_fetched_once() {
    let store = populated(CountingStore::default());
    let cache = RunCache::new(store.clone());
    let run = cache.get_run("run-1").unwrap();

    for _ in 0..3 {
        for indicator in run.indicators() {
            cache.get_indicator_data(indicator).unwrap();
        }
    }
    // one read per (run id, key), including the artifact-only "samples"
    assert_eq!(store.series_reads.load(Ordering::SeqCst), 3);
    assert_eq!(cache.stats().series_loads, 3);
}

#[test]
fn test_artifact_only_indicator_has_no_series() {
    let cache = RunCache::new(populated(CountingStore::default()));
    let run = cache.get_run("run-1").unwrap();
    let samples = run.indicator("samples").as_slice()[0].clone();

    assert!(cache.get_indicator_data(&samples).unwrap().is_none());
    let artifacts = cache.get_artifact_data(&samples).unwrap().unwrap();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].step(), 4);

    let loss = run.indicator("loss").as_slice()[0].clone();
    assert!(cache.get_artifact_data(&loss).unwrap().is_none());
}

#[test]
fn test_series_lookup_ignores_caller_kind() {
    let store = populated(CountingStore::default());
    let cache = RunCache::new(store.clone());

    let mislabelled = Indicator::new("run-1", "loss", IndicatorKind::Artifact);
    let scalar = Indicator::new("run-1", "loss", IndicatorKind::Scalar);

    let first = cache.get_indicator_data(&mislabelled).unwrap();
    let second = cache.get_indicator_data(&scalar).unwrap();

    assert_eq!(first.as_ref().map(|s| s.len()), Some(5));
    assert!(Arc::ptr_eq(&first.unwrap(), &second.unwrap()));
    assert_eq!(store.series_reads.load(Ordering::SeqCst), 1);
}

#[test]
fn test_concurrent_get_run_builds_once() {
    let store = populated(CountingStore::slow(Duration::from_millis(20)));
    let cache = Arc::new(RunCache::new(store.clone()));

    let runs: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| cache.get_run("run-1").unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(store.run_reads.load(Ordering::SeqCst), 1);
    assert!(runs.iter().all(|run| Arc::ptr_eq(run, &runs[0])));
}

#[test]
fn test_concurrent_series_fetch_converges() {
    let store = populated(CountingStore::slow(Duration::from_millis(20)));
    let cache = RunCache::new(store.clone());
    let loss = cache.get_run("run-1").unwrap().indicator("loss").as_slice()[0].clone();

    let payloads: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| cache.get_indicator_data(&loss).unwrap().unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(store.series_reads.load(Ordering::SeqCst), 1);
    assert!(payloads.iter().all(|p| Arc::ptr_eq(p, &payloads[0])));
}

#[test]
fn test_stale_until_evicted() {
    let store = populated(CountingStore::default());
    let cache = RunCache::new(store.clone());
    let loss = cache.get_run("run-1").unwrap().indicator("loss").as_slice()[0].clone();
    assert_eq!(cache.get_indicator_data(&loss).unwrap().unwrap().len(), 5);

    // Run keeps training
    store.inner.log_scalar("run-1", "loss", 5, 0.5);
    store.inner.log_scalar("run-1", "lr", 5, 1e-3);

    assert_eq!(cache.get_indicator_data(&loss).unwrap().unwrap().len(), 5);
    assert!(cache.get_run("run-1").unwrap().indicator("lr").is_empty());

    assert!(cache.evict_run("run-1"));
    assert_eq!(cache.get_indicator_data(&loss).unwrap().unwrap().len(), 6);
    assert_eq!(cache.get_run("run-1").unwrap().indicator("lr").len(), 1);
    assert_eq!(store.run_reads.load(Ordering::SeqCst), 2);
}
