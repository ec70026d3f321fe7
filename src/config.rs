//! Configuration
//!
//! ```json
//! {
//!   "store": { "kind": "parquet", "path": "runs/samples.parquet" },
//!   "log_filter": "trueno_analytics=debug"
//! }
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default `tracing` filter directive.
pub const DEFAULT_LOG_FILTER: &str = "trueno_analytics=info";

/// Which backing store to open.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Empty in-memory store (fill it through the builder).
    #[default]
    Memory,
    /// Sample file in the Parquet layout of [`crate::store::parquet`].
    Parquet {
        /// Path of the Parquet file.
        path: PathBuf,
    },
}

/// Top-level configuration of an [`Analytics`](crate::Analytics) session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Backing store selection.
    #[serde(default)]
    pub store: StoreConfig,
    /// `tracing` filter used by [`init_tracing`](crate::logging::init_tracing).
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            log_filter: default_log_filter(),
        }
    }
}

impl AnalyticsConfig {
    /// Parse a JSON configuration.
    ///
    /// # Errors
    /// Returns [`Error::Json`] if the text is not a valid configuration.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a JSON configuration file.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the file cannot be read, or
    /// [`Error::Json`] if it is not a valid configuration.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "Failed to read {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::from_json_str(&text)
    }
}
