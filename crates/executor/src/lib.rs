//! # Coral Executor
//!
//! The command layer for CoralDB.
//!
//! This crate sits between the textual command surface (REPL, tests,
//! embedding hosts) and the dataset engine. Every operation is parsed
//! into a typed [`Request`], enqueued on a single-writer FIFO, executed
//! by the worker thread against the [`Dataset`](coral_engine::Dataset),
//! and answered with a [`Reply`](coral_core::Reply).
//!
//! ```text
//! REPL     tests     embedding host
//!   │        │            │
//!   └────────┴────────────┘
//!                │
//!     ┌──────────┴──────────┐
//!     │  parse → Request    │   ← tokenizer + verb table
//!     └──────────┬──────────┘
//!                │ submit (FIFO, blocking reply slot)
//!     ┌──────────┴──────────┐
//!     │  worker thread      │   ← maintenance tick, dispatch, back-off
//!     └──────────┬──────────┘
//!                │
//!     ┌──────────┴──────────┐
//!     │  Reply              │   ← tagged result union
//!     └─────────────────────┘
//! ```
//!
//! Submitters observe their requests in submission order; across
//! submitters, queue order is execution order. Each request completes
//! fully before the next begins.

#![warn(clippy::all)]

mod coral;
mod executor;
mod parse;
mod pattern;
mod request;
mod worker;

// Handler modules
mod handlers;

pub mod global;

pub use coral::Coral;
pub use coral_core::{CommandError, Kind, Reply};
pub use coral_engine::{EngineConfig, EngineError};
pub use executor::execute;
pub use parse::parse_line;
pub use pattern::key_matches;
pub use request::{Action, Arg, Request};
