//! Error types for trueno-analytics
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// trueno-analytics error types
#[derive(Error, Debug)]
pub enum Error {
    /// Run identifier unknown to the backing store
    #[error("Run not found: {0}\nCheck the identifier against the backing store")]
    RunNotFound(String),

    /// Extraction yielded zero usable series
    #[error("No series found\nThe selected runs exist but logged nothing matching the request")]
    NoSeries,

    /// Scatter x-axis did not resolve to exactly one series
    #[error("There should be exactly one series for x-axis, found {found}")]
    XAxisCardinality {
        /// Number of series the x-axis collection resolved to
        found: usize,
    },

    /// Invalid input parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage error (backing store, Parquet/Arrow)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
