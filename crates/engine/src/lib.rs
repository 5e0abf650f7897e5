//! Dataset engine for CoralDB
//!
//! This crate owns the keyed dataset: the hash index plus the per-verb
//! data semantics (string get/set, list push/pop/range, sorted-set
//! add/range/rank/aggregate), memory accounting, and the snapshot glue
//! that seeds the index at start and serializes it on SAVE/shutdown.
//!
//! The [`Dataset`] is a plain single-writer value; request serialization
//! around it is the executor's job.

#![warn(clippy::all)]

pub mod config;
pub mod dataset;
pub mod error;

pub use config::EngineConfig;
pub use dataset::Dataset;
pub use error::EngineError;
