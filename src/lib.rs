//! # trueno-analytics: Cached Indicator Analytics for Training Runs
//!
//! **Version**: 0.1.0
//!
//! Pulls the indicators (scalars, histograms, artifacts) logged by past
//! training runs, combines them into collections, and shapes them for
//! visualization.
//!
//! ## Design Principles (Toyota Way Aligned)
//!
//! - **Muda elimination**: Every `(run, indicator)` payload is read from the
//!   backing store at most once per cache lifetime
//! - **Poka-Yoke safety**: Shaping functions validate before any renderer runs
//!   (empty results and ambiguous scatter axes are hard errors)
//! - **Jidoka**: Collections are value-like; union never mutates its operands
//!
//! ## Data Flow
//!
//! ```text
//! run id ─> RunCache ─> Run ─> IndicatorCollection ─> extract ─> shaping ─> Renderer | caller
//!              │
//!              └─> BackingStore (MemoryStore, Parquet)
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use trueno_analytics::store::MemoryStore;
//! use trueno_analytics::Analytics;
//!
//! # fn main() -> trueno_analytics::Result<()> {
//! let store = MemoryStore::new();
//! store.log_scalar("run-a", "train_loss", 0, 0.9);
//! store.log_scalar("run-a", "valid_loss", 0, 1.1);
//!
//! let analytics = Analytics::builder().memory_store(store).build()?;
//! let indicators = analytics.runs(["run-a"])?;
//! let losses = indicators.get("train_loss") + indicators.get("valid_loss");
//!
//! let (series, names) = analytics.indicator_data(&losses)?.into_parts();
//! assert_eq!(names, ["train_loss", "valid_loss"]);
//! assert_eq!(series[0].shape(), (1, 10));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod analytics;
pub mod cache;
pub mod collection;
pub mod config;
pub mod error;
pub mod extract;
pub mod indicator;
pub mod logging;
pub mod record;
pub mod render;
pub mod series;
pub mod shaping;
pub mod store;

pub use analytics::{Analytics, AnalyticsBuilder};
pub use cache::{CacheStats, Run, RunCache};
pub use collection::IndicatorCollection;
pub use config::AnalyticsConfig;
pub use error::{Error, Result};
pub use extract::SeriesSet;
pub use indicator::{Indicator, IndicatorId, IndicatorKind};
pub use render::{DistributionOptions, Noise, Renderer, ScatterOptions, TableRenderer};
pub use series::Series;
pub use shaping::IndicatorData;
