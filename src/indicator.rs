//! Indicator - one logged metric or artifact stream within one run

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Kind of data an indicator carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    /// One value per logged step.
    Scalar,
    /// A sample distribution per logged step.
    Histogram,
    /// Opaque one-off payloads (text, JSON, bytes); no numeric series.
    Artifact,
}

impl IndicatorKind {
    /// Get kind name as string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Histogram => "histogram",
            Self::Artifact => "artifact",
        }
    }

    /// Parse a kind name produced by [`as_str`](Self::as_str).
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "scalar" => Some(Self::Scalar),
            "histogram" => Some(Self::Histogram),
            "artifact" => Some(Self::Artifact),
            _ => None,
        }
    }
}

/// Identity of an indicator: owning run plus key.
///
/// Ordered by run id, then key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndicatorId {
    run_id: String,
    key: String,
}

impl IndicatorId {
    /// Create an indicator id.
    #[must_use]
    pub fn new(run_id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            key: key.into(),
        }
    }

    /// Get the owning run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the indicator key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for IndicatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.run_id, self.key)
    }
}

/// One logged metric/artifact stream of a run.
///
/// Two indicators are the same entity iff they share run id and key; the
/// kind tag does not take part in equality or hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Indicator {
    id: IndicatorId,
    kind: IndicatorKind,
}

impl Indicator {
    /// Create a new indicator.
    #[must_use]
    pub fn new(run_id: impl Into<String>, key: impl Into<String>, kind: IndicatorKind) -> Self {
        Self {
            id: IndicatorId::new(run_id, key),
            kind,
        }
    }

    /// Get the indicator identity.
    #[must_use]
    pub const fn id(&self) -> &IndicatorId {
        &self.id
    }

    /// Get the display key.
    #[must_use]
    pub fn key(&self) -> &str {
        self.id.key()
    }

    /// Get the owning run ID.
    #[must_use]
    pub fn run_id(&self) -> &str {
        self.id.run_id()
    }

    /// Get the indicator kind.
    #[must_use]
    pub const fn kind(&self) -> IndicatorKind {
        self.kind
    }
}

impl PartialEq for Indicator {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Indicator {}

impl Hash for Indicator {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
