//! Engine configuration.
//!
//! Two knobs, both fixed before the engine starts: the hash seed (default
//! is the wall clock, so chain distribution varies run to run) and the
//! persistence path (default `db.json`).

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Default snapshot file name.
pub const DEFAULT_PERSISTENCE_FILE: &str = "db.json";

/// Start-time configuration for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Seed for the index hash function; `None` means "derive from the
    /// wall clock at start".
    pub hash_seed: Option<u32>,
    /// Snapshot file location.
    pub persistence_path: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            hash_seed: None,
            persistence_path: DEFAULT_PERSISTENCE_FILE.into(),
        }
    }
}

impl EngineConfig {
    /// Configuration with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the hash seed (useful for reproducible chain layouts).
    pub fn hash_seed(mut self, seed: u32) -> Self {
        self.hash_seed = Some(seed);
        self
    }

    /// Set the snapshot file location.
    pub fn persistence_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.persistence_path = path.into();
        self
    }

    /// The seed the index will actually use.
    pub fn resolved_seed(&self) -> u32 {
        self.hash_seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() as u32)
                .unwrap_or(0)
        })
    }
}
