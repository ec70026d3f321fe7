//! In-memory backing store using `DashMap`.
//!
//! Data is lost on process restart; use [`super::parquet`] to persist sample
//! data between sessions.

use super::BackingStore;
use crate::indicator::{Indicator, IndicatorId, IndicatorKind};
use crate::record::{ArtifactRecord, ArtifactSeries, RunRecord};
use crate::series::Series;
use crate::{Error, Result};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct RunEntry {
    record: RunRecord,
    // First-logged order
    indicators: Vec<(String, IndicatorKind)>,
}

/// Concurrent in-memory store of runs, per-step samples and artifacts.
///
/// All writes take `&self`, so a store can keep receiving data while a
/// [`RunCache`](crate::RunCache) reads from it through an `Arc`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    runs: DashMap<String, RunEntry>,
    samples: DashMap<IndicatorId, BTreeMap<u64, Vec<f64>>>,
    artifacts: DashMap<IndicatorId, ArtifactSeries>,
}

/// A series kind wins over artifact; histogram wins over scalar.
const fn merge_kind(current: IndicatorKind, logged: IndicatorKind) -> IndicatorKind {
    match (current, logged) {
        (IndicatorKind::Artifact, other) | (other, IndicatorKind::Artifact) => other,
        (IndicatorKind::Histogram, _) | (_, IndicatorKind::Histogram) => IndicatorKind::Histogram,
        _ => IndicatorKind::Scalar,
    }
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of runs in the store.
    #[must_use]
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Check if the store holds no runs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Sorted IDs of every run in the store.
    #[must_use]
    pub fn run_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.runs.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Add or replace a run record, keeping any indicators already logged.
    pub fn add_run(&self, record: RunRecord) {
        match self.runs.entry(record.run_id().to_string()) {
            Entry::Occupied(mut occupied) => occupied.get_mut().record = record,
            Entry::Vacant(vacant) => {
                vacant.insert(RunEntry {
                    record,
                    indicators: Vec::new(),
                });
            }
        }
    }

    fn register(&self, run_id: &str, key: &str, kind: IndicatorKind) {
        let mut entry = self
            .runs
            .entry(run_id.to_string())
            .or_insert_with(|| RunEntry {
                record: RunRecord::new(run_id),
                indicators: Vec::new(),
            });
        match entry.indicators.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = merge_kind(*existing, kind),
            None => entry.indicators.push((key.to_string(), kind)),
        }
    }

    /// Log a scalar value. Logging the same step twice keeps the last value.
    pub fn log_scalar(&self, run_id: &str, key: &str, step: u64, value: f64) {
        self.register(run_id, key, IndicatorKind::Scalar);
        self.samples
            .entry(IndicatorId::new(run_id, key))
            .or_default()
            .insert(step, vec![value]);
    }

    /// Log histogram samples for a step, appending to any already logged there.
    pub fn log_histogram(&self, run_id: &str, key: &str, step: u64, samples: &[f64]) {
        self.register(run_id, key, IndicatorKind::Histogram);
        self.samples
            .entry(IndicatorId::new(run_id, key))
            .or_default()
            .entry(step)
            .or_default()
            .extend_from_slice(samples);
    }

    /// Log an artifact payload.
    pub fn log_artifact(&self, artifact: ArtifactRecord) {
        self.register(artifact.run_id(), artifact.key(), IndicatorKind::Artifact);
        let mut series = self
            .artifacts
            .entry(IndicatorId::new(artifact.run_id(), artifact.key()))
            .or_default();
        let at = series.partition_point(|a| a.step() <= artifact.step());
        series.insert(at, artifact);
    }

    /// Flattened `(id, kind, step, value)` sample rows, runs sorted by ID,
    /// indicators in first-logged order, steps ascending.
    pub(super) fn sample_rows(&self) -> Vec<(IndicatorId, IndicatorKind, u64, f64)> {
        let mut rows = Vec::new();
        for run_id in self.run_ids() {
            let Some(indicators) = self.runs.get(&run_id).map(|e| e.indicators.clone()) else {
                continue;
            };
            for (key, kind) in indicators {
                let id = IndicatorId::new(run_id.as_str(), key);
                let Some(steps) = self.samples.get(&id) else {
                    continue;
                };
                for (&step, values) in steps.iter() {
                    rows.extend(values.iter().map(|&v| (id.clone(), kind, step, v)));
                }
            }
        }
        rows
    }
}

impl BackingStore for MemoryStore {
    fn run_record(&self, run_id: &str) -> Result<Option<RunRecord>> {
        Ok(self.runs.get(run_id).map(|entry| entry.record.clone()))
    }

    fn list_indicators(&self, run_id: &str) -> Result<Vec<Indicator>> {
        let entry = self
            .runs
            .get(run_id)
            .ok_or_else(|| Error::RunNotFound(run_id.to_string()))?;
        Ok(entry
            .indicators
            .iter()
            .map(|(key, kind)| Indicator::new(run_id, key.as_str(), *kind))
            .collect())
    }

    fn fetch_series(&self, run_id: &str, key: &str) -> Result<Option<Series>> {
        let id = IndicatorId::new(run_id, key);
        Ok(self.samples.get(&id).and_then(|steps| {
            Series::from_samples(steps.iter().map(|(&step, v)| (step, v.as_slice())))
        }))
    }

    fn fetch_artifacts(&self, run_id: &str, key: &str) -> Result<Option<ArtifactSeries>> {
        let id = IndicatorId::new(run_id, key);
        Ok(self
            .artifacts
            .get(&id)
            .filter(|series| !series.is_empty())
            .map(|series| series.value().clone()))
    }
}
