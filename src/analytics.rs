//! Analytics facade
//!
//! Owns one [`RunCache`] and exposes the public entry points: `runs`,
//! `get_run`, `get_data` and the shaping functions.

use crate::cache::{CacheStats, Run, RunCache};
use crate::collection::IndicatorCollection;
use crate::config::{AnalyticsConfig, StoreConfig};
use crate::extract::SeriesSet;
use crate::logging;
use crate::record::ArtifactSeries;
use crate::render::{DistributionOptions, Renderer, ScatterOptions};
use crate::series::Series;
use crate::shaping::{self, IndicatorData};
use crate::store::{parquet, BackingStore, MemoryStore};
use crate::Result;
use std::path::PathBuf;
use std::sync::Arc;

/// Analysis session over one backing store.
///
/// ```rust
/// use trueno_analytics::store::MemoryStore;
/// use trueno_analytics::{Analytics, DistributionOptions, TableRenderer};
///
/// # fn main() -> trueno_analytics::Result<()> {
/// let store = MemoryStore::new();
/// for step in 0..10 {
///     store.log_scalar("run-a", "train_loss", step, 1.0 / (step as f64 + 1.0));
///     store.log_scalar("run-b", "train_loss", step, 2.0 / (step as f64 + 1.0));
/// }
///
/// let analytics = Analytics::builder().memory_store(store).build()?;
/// let losses = analytics.runs(["run-a", "run-b"])?.get("train_loss");
/// assert_eq!(losses.len(), 2);
///
/// let chart = analytics.distribution(&TableRenderer::new(), &losses, &DistributionOptions::default())?;
/// assert_eq!(chart["layers"].as_array().map(Vec::len), Some(2));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Analytics {
    cache: RunCache,
}

impl Analytics {
    /// Create a session over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn BackingStore>) -> Self {
        Self {
            cache: RunCache::new(store),
        }
    }

    /// Create a new session builder.
    #[must_use]
    pub fn builder() -> AnalyticsBuilder {
        AnalyticsBuilder::default()
    }

    /// Open the store named by `config` and install a `tracing` subscriber
    /// with its `log_filter` (a no-op if one is already installed).
    ///
    /// # Errors
    ///
    /// Returns error if a Parquet store cannot be loaded.
    pub fn from_config(config: &AnalyticsConfig) -> Result<Self> {
        logging::init_tracing(&config.log_filter);
        let builder = match &config.store {
            StoreConfig::Memory => Self::builder(),
            StoreConfig::Parquet { path } => Self::builder().parquet(path.clone()),
        };
        builder.build()
    }

    /// The underlying cache.
    #[must_use]
    pub const fn cache(&self) -> &RunCache {
        &self.cache
    }

    /// All indicators of the given runs, unioned in argument order.
    ///
    /// No identifiers yields an empty collection.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RunNotFound`](crate::Error::RunNotFound) for the first
    /// unknown run.
    pub fn runs<I, S>(&self, run_ids: I) -> Result<IndicatorCollection>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        run_ids
            .into_iter()
            .try_fold(IndicatorCollection::empty(), |acc, run_id| {
                Ok(acc + self.cache.get_run(run_id.as_ref())?.indicators())
            })
    }

    /// Get the cached run for `run_id`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RunNotFound`](crate::Error::RunNotFound) for unknown runs.
    pub fn get_run(&self, run_id: &str) -> Result<Arc<Run>> {
        self.cache.get_run(run_id)
    }

    /// `(step, median)` rows of every indicator with a series.
    ///
    /// # Errors
    ///
    /// Returns the store's error if a fetch fails.
    pub fn get_data(&self, collection: &IndicatorCollection) -> Result<IndicatorData> {
        shaping::get_data(&self.cache, collection)
    }

    /// Density chart of `collection`; see [`shaping::distribution`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSeries`](crate::Error::NoSeries) if nothing was extracted.
    pub fn distribution<R: Renderer>(
        &self,
        renderer: &R,
        collection: &IndicatorCollection,
        options: &DistributionOptions,
    ) -> Result<R::Chart> {
        shaping::distribution(&self.cache, renderer, collection, options)
    }

    /// Scatter chart of `collection` against `x`; see [`shaping::scatter`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::XAxisCardinality`](crate::Error::XAxisCardinality) or
    /// [`Error::NoSeries`](crate::Error::NoSeries) on invalid input.
    pub fn scatter<R: Renderer>(
        &self,
        renderer: &R,
        collection: &IndicatorCollection,
        x: &IndicatorCollection,
        options: &ScatterOptions,
    ) -> Result<R::Chart> {
        shaping::scatter(&self.cache, renderer, collection, x, options)
    }

    /// Raw series and names; see [`shaping::indicator_data`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSeries`](crate::Error::NoSeries) if nothing was extracted.
    pub fn indicator_data(
        &self,
        collection: &IndicatorCollection,
    ) -> Result<SeriesSet<Arc<Series>>> {
        shaping::indicator_data(&self.cache, collection)
    }

    /// Raw artifact series and names; see [`shaping::artifact_data`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSeries`](crate::Error::NoSeries) if nothing was extracted.
    pub fn artifact_data(
        &self,
        collection: &IndicatorCollection,
    ) -> Result<SeriesSet<Arc<ArtifactSeries>>> {
        shaping::artifact_data(&self.cache, collection)
    }

    /// Forget a run so the next access re-reads the store.
    pub fn evict_run(&self, run_id: &str) -> bool {
        self.cache.evict_run(run_id)
    }

    /// Forget every cached run and payload.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Cache counters.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

enum StoreSource {
    Store(Arc<dyn BackingStore>),
    Parquet(PathBuf),
}

/// Session builder
#[derive(Default)]
pub struct AnalyticsBuilder {
    source: Option<StoreSource>,
}

impl AnalyticsBuilder {
    /// Use an existing backing store.
    #[must_use]
    pub fn store(mut self, store: Arc<dyn BackingStore>) -> Self {
        self.source = Some(StoreSource::Store(store));
        self
    }

    /// Use an in-memory store.
    #[must_use]
    pub fn memory_store(self, store: MemoryStore) -> Self {
        self.store(Arc::new(store))
    }

    /// Load samples from a Parquet file when building.
    #[must_use]
    pub fn parquet(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(StoreSource::Parquet(path.into()));
        self
    }

    /// Build the session. Without a store, an empty [`MemoryStore`] is used.
    ///
    /// # Errors
    ///
    /// Returns error if a Parquet store cannot be loaded.
    pub fn build(self) -> Result<Analytics> {
        let store: Arc<dyn BackingStore> = match self.source {
            Some(StoreSource::Store(store)) => store,
            Some(StoreSource::Parquet(path)) => Arc::new(parquet::load_parquet(path)?),
            None => Arc::new(MemoryStore::new()),
        };
        Ok(Analytics::new(store))
    }
}
