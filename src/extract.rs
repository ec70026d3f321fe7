//! Series extraction
//!
//! Turns an [`IndicatorCollection`] into index-aligned payload and name lists,
//! skipping indicators whose payload is absent.

use crate::cache::RunCache;
use crate::collection::IndicatorCollection;
use crate::indicator::Indicator;
use crate::record::ArtifactSeries;
use crate::series::Series;
use crate::Result;
use std::sync::Arc;

/// Payloads with their display names; `names[i]` labels `series[i]`.
#[derive(Debug, Clone)]
pub struct SeriesSet<T> {
    series: Vec<T>,
    names: Vec<String>,
}

impl<T> SeriesSet<T> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            series: Vec::with_capacity(capacity),
            names: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, payload: T, name: &str) {
        self.series.push(payload);
        self.names.push(name.to_string());
    }

    /// Number of extracted payloads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Check if nothing was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Extracted payloads, in collection order.
    #[must_use]
    pub fn series(&self) -> &[T] {
        &self.series
    }

    /// Display names, aligned with [`series`](Self::series).
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Iterate `(payload, name)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&T, &str)> {
        self.series.iter().zip(self.names.iter().map(String::as_str))
    }

    /// Split into the parallel `(series, names)` lists.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, Vec<String>) {
        (self.series, self.names)
    }
}

fn extract<T>(
    collection: &IndicatorCollection,
    mut fetch: impl FnMut(&Indicator) -> Result<Option<T>>,
) -> Result<SeriesSet<T>> {
    let mut set = SeriesSet::with_capacity(collection.len());
    for indicator in collection {
        if let Some(payload) = fetch(indicator)? {
            set.push(payload, indicator.key());
        }
    }
    Ok(set)
}

/// Extract the numeric series of every indicator that has one.
///
/// # Errors
///
/// Returns the backing store's error if a fetch fails.
pub fn extract_series(
    cache: &RunCache,
    collection: &IndicatorCollection,
) -> Result<SeriesSet<Arc<Series>>> {
    extract(collection, |indicator| cache.get_indicator_data(indicator))
}

/// Extract the artifact series of every indicator that has one.
///
/// # Errors
///
/// Returns the backing store's error if a fetch fails.
pub fn extract_artifacts(
    cache: &RunCache,
    collection: &IndicatorCollection,
) -> Result<SeriesSet<Arc<ArtifactSeries>>> {
    extract(collection, |indicator| cache.get_artifact_data(indicator))
}
