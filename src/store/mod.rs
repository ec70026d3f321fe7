//! Backing stores for logged run data
//!
//! The cache layer only depends on the [`BackingStore`] trait. Two stores ship
//! with the crate:
//! - [`MemoryStore`]: concurrent in-memory store, written to by loggers/tests
//! - [`parquet`]: load/save a [`MemoryStore`] as a columnar Parquet file
//!
//! # Example
//!
//! ```rust
//! use trueno_analytics::store::{BackingStore, MemoryStore};
//!
//! # fn main() -> trueno_analytics::Result<()> {
//! let store = MemoryStore::new();
//! store.log_scalar("run-1", "loss", 0, 1.0);
//! store.log_histogram("run-1", "weights", 0, &[-0.5, 0.0, 0.5]);
//!
//! let keys: Vec<String> = store
//!     .list_indicators("run-1")?
//!     .iter()
//!     .map(|i| i.key().to_string())
//!     .collect();
//! assert_eq!(keys, ["loss", "weights"]);
//! # Ok(())
//! # }
//! ```

mod memory;
pub mod parquet;

pub use memory::MemoryStore;

use crate::indicator::Indicator;
use crate::record::{ArtifactSeries, RunRecord};
use crate::series::Series;
use crate::Result;
use std::sync::Arc;

/// Storage protocol the run cache is layered on.
///
/// Calls are blocking; implementations own any retry policy.
pub trait BackingStore: Send + Sync {
    /// Get the record of a run, `None` if the run is unknown.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read.
    fn run_record(&self, run_id: &str) -> Result<Option<RunRecord>>;

    /// List every indicator a run logged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RunNotFound`](crate::Error::RunNotFound) for unknown
    /// runs, or a storage error if the store cannot be read.
    fn list_indicators(&self, run_id: &str) -> Result<Vec<Indicator>>;

    /// Fetch the `[T, 10]` series of an indicator.
    ///
    /// Returns `Ok(None)` when the indicator has no numeric data.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read.
    fn fetch_series(&self, run_id: &str, key: &str) -> Result<Option<Series>>;

    /// Fetch the artifact series of an indicator.
    ///
    /// Returns `Ok(None)` when the indicator has no artifacts.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read.
    fn fetch_artifacts(&self, run_id: &str, key: &str) -> Result<Option<ArtifactSeries>>;
}

impl<S: BackingStore + ?Sized> BackingStore for Arc<S> {
    fn run_record(&self, run_id: &str) -> Result<Option<RunRecord>> {
        (**self).run_record(run_id)
    }

    fn list_indicators(&self, run_id: &str) -> Result<Vec<Indicator>> {
        (**self).list_indicators(run_id)
    }

    fn fetch_series(&self, run_id: &str, key: &str) -> Result<Option<Series>> {
        (**self).fetch_series(run_id, key)
    }

    fn fetch_artifacts(&self, run_id: &str, key: &str) -> Result<Option<ArtifactSeries>> {
        (**self).fetch_artifacts(run_id, key)
    }
}
