//! Process-wide single instance.
//!
//! For hosts that want the global shape back: one engine per process,
//! initialized once, reachable from anywhere. Library users who want
//! several engines construct [`Coral`] values directly instead.

use coral_engine::{EngineConfig, EngineError};
use once_cell::sync::OnceCell;

use crate::coral::Coral;

static INSTANCE: OnceCell<Coral> = OnceCell::new();

/// Start the process-wide engine, or return the existing one. The
/// configuration of the first successful call wins.
pub fn init(config: EngineConfig) -> Result<&'static Coral, EngineError> {
    INSTANCE.get_or_try_init(|| Coral::start(config))
}

/// The process-wide engine, if [`init`] has run.
pub fn get() -> Option<&'static Coral> {
    INSTANCE.get()
}
