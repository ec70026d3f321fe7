//! Run cache
//!
//! Resolves run identifiers to [`Run`]s and memoizes per-indicator series and
//! artifact payloads keyed by `(run id, key)`.
//!
//! **Concurrency**: every map is a `DashMap`; population goes through the
//! entry API, which holds the shard lock while the backing store is read. Two
//! callers asking for the same uncached key therefore converge on one fetch
//! and one cached value.
//!
//! **Staleness**: nothing is invalidated automatically. Call
//! [`RunCache::evict_run`] or [`RunCache::clear`] to observe data logged
//! after the first fetch.

use crate::collection::IndicatorCollection;
use crate::indicator::{Indicator, IndicatorId};
use crate::record::{ArtifactSeries, RunRecord};
use crate::series::Series;
use crate::store::BackingStore;
use crate::{Error, Result};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A resolved run: its record plus every indicator it logged.
///
/// Immutable once built; shared as `Arc<Run>`.
#[derive(Debug)]
pub struct Run {
    record: RunRecord,
    indicators: IndicatorCollection,
}

impl Run {
    /// Get the run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        self.record.run_id()
    }

    /// Get the run record.
    #[must_use]
    pub const fn record(&self) -> &RunRecord {
        &self.record
    }

    /// Every indicator the run logged.
    #[must_use]
    pub const fn indicators(&self) -> &IndicatorCollection {
        &self.indicators
    }

    /// Indicators of this run with the given key.
    #[must_use]
    pub fn indicator(&self, key: &str) -> IndicatorCollection {
        self.indicators.get(key)
    }
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Runs built from the backing store.
    pub run_loads: u64,
    /// Series fetched from the backing store.
    pub series_loads: u64,
    /// Artifact series fetched from the backing store.
    pub artifact_loads: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    run_loads: AtomicU64,
    series_loads: AtomicU64,
    artifact_loads: AtomicU64,
}

/// Memoizing resolver over a [`BackingStore`].
pub struct RunCache {
    store: Arc<dyn BackingStore>,
    runs: DashMap<String, Arc<Run>>,
    series: DashMap<IndicatorId, Option<Arc<Series>>>,
    artifacts: DashMap<IndicatorId, Option<Arc<ArtifactSeries>>>,
    counters: Counters,
}

impl std::fmt::Debug for RunCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunCache")
            .field("runs", &self.runs.len())
            .field("series", &self.series.len())
            .field("artifacts", &self.artifacts.len())
            .finish_non_exhaustive()
    }
}

impl RunCache {
    /// Create an empty cache over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn BackingStore>) -> Self {
        Self {
            store,
            runs: DashMap::new(),
            series: DashMap::new(),
            artifacts: DashMap::new(),
            counters: Counters::default(),
        }
    }

    /// The backing store this cache reads from.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn BackingStore> {
        &self.store
    }

    /// Get the run for `run_id`, building and caching it on first access.
    ///
    /// Repeated calls return the same `Arc`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RunNotFound`] if the store does not know the run, or
    /// the store's error if it cannot be read. Failures are not cached.
    pub fn get_run(&self, run_id: &str) -> Result<Arc<Run>> {
        if let Some(run) = self.runs.get(run_id) {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(run.value()));
        }

        let run = self
            .runs
            .entry(run_id.to_string())
            .or_try_insert_with(|| self.load_run(run_id))?;
        Ok(Arc::clone(run.value()))
    }

    fn load_run(&self, run_id: &str) -> Result<Arc<Run>> {
        let record = self
            .store
            .run_record(run_id)?
            .ok_or_else(|| Error::RunNotFound(run_id.to_string()))?;
        let indicators = IndicatorCollection::new(self.store.list_indicators(run_id)?);

        self.counters.run_loads.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(run_id, indicators = indicators.len(), "run cache miss");

        Ok(Arc::new(Run { record, indicators }))
    }

    /// Get the memoized series of `indicator`.
    ///
    /// Returns `Ok(None)` when the store holds no numeric series for the
    /// indicator's `(run id, key)`. Absent results are memoized as well. The
    /// indicator's kind is not consulted; the result depends on its id only.
    ///
    /// # Errors
    ///
    /// Returns the store's error if it cannot be read. Failures are not cached.
    pub fn get_indicator_data(&self, indicator: &Indicator) -> Result<Option<Arc<Series>>> {
        if let Some(series) = self.series.get(indicator.id()) {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(series.value().clone());
        }

        let entry = self
            .series
            .entry(indicator.id().clone())
            .or_try_insert_with(|| {
                let series = self
                    .store
                    .fetch_series(indicator.run_id(), indicator.key())?
                    .map(Arc::new);
                self.counters.series_loads.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(indicator = %indicator.id(), found = series.is_some(), "series cache miss");
                Ok::<_, Error>(series)
            })?;
        Ok(entry.value().clone())
    }

    /// Get the memoized artifact series of `indicator`.
    ///
    /// Returns `Ok(None)` when the indicator logged no artifacts.
    ///
    /// # Errors
    ///
    /// Returns the store's error if it cannot be read. Failures are not cached.
    pub fn get_artifact_data(&self, indicator: &Indicator) -> Result<Option<Arc<ArtifactSeries>>> {
        if let Some(artifacts) = self.artifacts.get(indicator.id()) {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(artifacts.value().clone());
        }

        let entry = self
            .artifacts
            .entry(indicator.id().clone())
            .or_try_insert_with(|| {
                let artifacts = self
                    .store
                    .fetch_artifacts(indicator.run_id(), indicator.key())?
                    .map(Arc::new);
                self.counters.artifact_loads.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(indicator = %indicator.id(), found = artifacts.is_some(), "artifact cache miss");
                Ok::<_, Error>(artifacts)
            })?;
        Ok(entry.value().clone())
    }

    /// Drop a run and every payload cached for it.
    ///
    /// Returns whether the run itself was cached.
    pub fn evict_run(&self, run_id: &str) -> bool {
        let removed = self.runs.remove(run_id).is_some();
        self.series.retain(|id, _| id.run_id() != run_id);
        self.artifacts.retain(|id, _| id.run_id() != run_id);
        tracing::info!(run_id, removed, "evicted run from cache");
        removed
    }

    /// Drop everything.
    pub fn clear(&self) {
        self.runs.clear();
        self.series.clear();
        self.artifacts.clear();
        tracing::info!("cleared run cache");
    }

    /// Number of cached runs.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Number of cached per-indicator entries (series and artifacts).
    #[must_use]
    pub fn payload_count(&self) -> usize {
        self.series.len() + self.artifacts.len()
    }

    /// Snapshot of hit/load counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            run_loads: self.counters.run_loads.load(Ordering::Relaxed),
            series_loads: self.counters.series_loads.load(Ordering::Relaxed),
            artifact_loads: self.counters.artifact_loads.load(Ordering::Relaxed),
        }
    }
}
