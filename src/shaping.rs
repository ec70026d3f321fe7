//! Shaping functions
//!
//! Each function extracts series from a collection, validates them, and
//! either returns them or hands them unmodified to a [`Renderer`]. No renderer
//! is invoked when validation fails.

use crate::cache::RunCache;
use crate::collection::IndicatorCollection;
use crate::extract::{extract_artifacts, extract_series, SeriesSet};
use crate::indicator::IndicatorId;
use crate::record::ArtifactSeries;
use crate::render::{DistributionOptions, Renderer, ScatterOptions};
use crate::series::Series;
use crate::{Error, Result};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// `(step, median)` rows keyed by `(run id, key)`.
///
/// Keyed by the full indicator identity so the same metric from several runs
/// never overwrites itself.
pub type IndicatorData = FxHashMap<IndicatorId, Vec<[f64; 2]>>;

fn non_empty<T>(set: SeriesSet<T>) -> Result<SeriesSet<T>> {
    if set.is_empty() {
        Err(Error::NoSeries)
    } else {
        Ok(set)
    }
}

/// Render a density chart of every series in `collection`.
///
/// # Errors
///
/// Returns [`Error::NoSeries`] if no indicator has a series, otherwise the
/// renderer's or store's error.
pub fn distribution<R: Renderer>(
    cache: &RunCache,
    renderer: &R,
    collection: &IndicatorCollection,
    options: &DistributionOptions,
) -> Result<R::Chart> {
    let set = non_empty(extract_series(cache, collection)?)?;
    tracing::debug!(series = set.len(), "rendering distribution");
    renderer.density(set.series(), set.names(), options)
}

/// Render every series in `collection` against the single series of `x`.
///
/// # Errors
///
/// Returns [`Error::XAxisCardinality`] unless `x` resolves to exactly one
/// series, [`Error::NoSeries`] if `collection` has none, otherwise the
/// renderer's or store's error.
pub fn scatter<R: Renderer>(
    cache: &RunCache,
    renderer: &R,
    collection: &IndicatorCollection,
    x: &IndicatorCollection,
    options: &ScatterOptions,
) -> Result<R::Chart> {
    let set = extract_series(cache, collection)?;
    let x_set = extract_series(cache, x)?;

    if x_set.len() != 1 {
        return Err(Error::XAxisCardinality { found: x_set.len() });
    }
    let set = non_empty(set)?;

    tracing::debug!(series = set.len(), x = %x_set.names()[0], "rendering scatter");
    renderer.scatter(
        set.series(),
        set.names(),
        &x_set.series()[0],
        &x_set.names()[0],
        options,
    )
}

/// Raw series and names of `collection`.
///
/// Each series is `[T, 10]`: column 0 is the global step, columns 1-9 the
/// distribution at [`BASIS_POINTS`](crate::series::BASIS_POINTS).
///
/// # Errors
///
/// Returns [`Error::NoSeries`] if no indicator has a series.
pub fn indicator_data(
    cache: &RunCache,
    collection: &IndicatorCollection,
) -> Result<SeriesSet<Arc<Series>>> {
    non_empty(extract_series(cache, collection)?)
}

/// Raw artifact series and names of `collection`.
///
/// # Errors
///
/// Returns [`Error::NoSeries`] if no indicator logged artifacts.
pub fn artifact_data(
    cache: &RunCache,
    collection: &IndicatorCollection,
) -> Result<SeriesSet<Arc<ArtifactSeries>>> {
    non_empty(extract_artifacts(cache, collection)?)
}

/// `(step, median)` projection of every indicator with a series.
///
/// Indicators without a series are left out of the map.
///
/// # Errors
///
/// Returns the store's error if a fetch fails.
pub fn get_data(cache: &RunCache, collection: &IndicatorCollection) -> Result<IndicatorData> {
    let mut data = IndicatorData::default();
    for indicator in collection {
        if let Some(series) = cache.get_indicator_data(indicator)? {
            data.insert(indicator.id().clone(), series.summary());
        }
    }
    Ok(data)
}
