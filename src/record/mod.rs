//! Run tracking records
//!
//! ## Schema Overview
//!
//! ```text
//! RunRecord (1) ──< indicator samples (N) [time-series, per step]
//!                └──< ArtifactRecord (N)  [one-off payloads, per step]
//! ```

mod artifact_record;
mod run_record;

pub use artifact_record::{ArtifactContent, ArtifactRecord, ArtifactSeries};
pub use run_record::{RunRecord, RunRecordBuilder, RunStatus};
