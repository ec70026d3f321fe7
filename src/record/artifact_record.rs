//! Artifact Record - non-series payloads logged by a run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload of one artifact entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ArtifactContent {
    /// Free text (samples, logs, generated output).
    Text(String),
    /// Structured JSON (tables, confusion matrices, configs).
    Json(serde_json::Value),
    /// Raw bytes (images, serialized tensors).
    Bytes(Vec<u8>),
}

/// Artifact Record represents one artifact payload logged at a step.
///
/// All records sharing `run_id` and `key` form that indicator's artifact
/// series, ordered by step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtifactRecord {
    run_id: String,
    key: String,
    step: u64,
    content: ArtifactContent,
    created_at: DateTime<Utc>,
}

/// Artifact series of one indicator, ordered by step.
pub type ArtifactSeries = Vec<ArtifactRecord>;

impl ArtifactRecord {
    /// Create a new artifact record with the current timestamp.
    #[must_use]
    pub fn new(
        run_id: impl Into<String>,
        key: impl Into<String>,
        step: u64,
        content: ArtifactContent,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            key: key.into(),
            step,
            content,
            created_at: Utc::now(),
        }
    }

    /// Get the run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the artifact key/name.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the step the artifact was logged at.
    #[must_use]
    pub const fn step(&self) -> u64 {
        self.step
    }

    /// Get the payload.
    #[must_use]
    pub const fn content(&self) -> &ArtifactContent {
        &self.content
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
