//! Engine-level fatal errors.
//!
//! Command failures never appear here; they travel as
//! [`coral_core::CommandError`] and become error replies. This type is
//! for conditions that make the dataset unusable, reported to the host
//! at start (corrupt snapshot) or surfaced to logs on save.

use coral_durability::SnapshotError;
use thiserror::Error;

/// Fatal engine failures.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Snapshot load or save failed.
    #[error("snapshot failure: {0}")]
    Snapshot(#[from] SnapshotError),
}
