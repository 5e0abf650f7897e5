//! Error types for snapshot persistence.

use std::io;
use thiserror::Error;

/// Result alias for snapshot operations.
pub type SnapshotResult<T> = std::result::Result<T, SnapshotError>;

/// Failures while reading or writing a snapshot file.
///
/// Read-side failures are fatal to engine start (a present-but-corrupt
/// snapshot means the dataset is unusable); write-side failures are
/// logged by the caller and leave the previous snapshot untouched.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Filesystem failure.
    #[error("snapshot I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file exists but is not valid JSON.
    #[error("snapshot parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The file parses but its root is not a JSON object.
    #[error("snapshot root is not a JSON object")]
    NotAnObject,
}
