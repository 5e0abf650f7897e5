//! # CoralDB
//!
//! An embedded in-memory key-value store with a Redis-style command
//! surface and optional JSON-file persistence.
//!
//! Clients submit textual commands; the engine parses them, executes
//! them against a keyed dataset of strings, doubly-linked lists and
//! sorted sets, and returns structured replies. A single worker thread
//! services a FIFO request queue, so callers get sequential execution
//! with concurrent submission.
//!
//! # Quick Start
//!
//! ```no_run
//! use coraldb::{Coral, EngineConfig, Reply};
//!
//! fn main() -> Result<(), coraldb::EngineError> {
//!     let db = Coral::start(EngineConfig::new().persistence_path("db.json"))?;
//!
//!     assert_eq!(db.command("SET author cch137"), Reply::Bool(true));
//!     assert_eq!(db.command("GET author"), Reply::Str("cch137".into()));
//!
//!     db.command("RPUSH queue a b c");
//!     db.command("ZADD board 1 alice 2 bob");
//!
//!     db.shutdown(); // persists to db.json
//!     Ok(())
//! }
//! ```
//!
//! # Command surface
//!
//! | Group | Verbs |
//! |-------|-------|
//! | Strings | `SET`, `GET`, `RENAME`, `DEL` |
//! | Lists | `LPUSH`, `RPUSH`, `LPOP`, `RPOP`, `LLEN`, `LRANGE` |
//! | Sorted sets | `ZADD`, `ZREM`, `ZSCORE`, `ZCARD`, `ZCOUNT`, `ZRANGE`, `ZREVRANGE`, `ZRANGEBYSCORE`, `ZREVRANGEBYSCORE`, `ZRANK`, `ZREVRANK`, `ZREMRANGEBYSCORE`, `ZINTERSTORE`, `ZUNIONSTORE` |
//! | Dataset | `KEYS`, `FLUSHALL`, `INFO_DATASET_MEMORY`, `SAVE`, `START`, `SHUTDOWN` |
//!
//! # Architecture
//!
//! The [`Coral`] struct is the main entry point; all operations go
//! through it. Internal crates (storage, engine, durability) are not
//! exposed — only the command surface in this crate is stable.

// Re-export the public API from coral-executor
pub use coral_executor::*;
