//! Durability layer for CoralDB
//!
//! This crate handles everything that touches disk: loading the JSON
//! snapshot at engine start and writing it back on SAVE/shutdown. The
//! on-disk format is a single JSON object keyed by dataset keys; each
//! value encodes its entry kind (string, array of strings, or array of
//! `[member, score]` pairs).
//!
//! Writers are crash-safe: the new snapshot is written to a temporary
//! file, fsynced, and atomically renamed over the previous one, so either
//! the complete new snapshot is visible or the old one survives intact.

#![warn(clippy::all)]

pub mod error;
pub mod snapshot;

pub use error::{SnapshotError, SnapshotResult};
pub use snapshot::{read_snapshot, write_snapshot, SnapshotValue};
