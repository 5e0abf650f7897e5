//! Command-level error model.
//!
//! We use `thiserror` for automatic `Display` and `Error` implementations.
//! The `Display` text of each variant is the exact wire text delivered to
//! clients inside `Reply::Error`, so formatting lives here and nowhere
//! else.
//!
//! These are *command* failures: the worker always produces a reply, and a
//! `CommandError` becomes `Reply::Error(text)` at the dispatch boundary.
//! Fatal conditions (snapshot corruption at load, allocation failure) are
//! not represented here; they abort startup through the durability and
//! engine error types instead.

use crate::kind::Kind;
use crate::reply::Reply;
use thiserror::Error;

/// Result alias for operations that fail with a command error.
pub type CommandResult<T> = std::result::Result<T, CommandError>;

/// Failures a command can report to its submitter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The first token of the line is not a known verb.
    #[error("ERR unknown command")]
    UnknownCommand,

    /// Wrong arity, or an argument that does not coerce to the needed type.
    #[error("ERR wrong arguments")]
    WrongArguments,

    /// The existing entry's kind conflicts with the verb.
    #[error("WRONGTYPE Operation against a key holding the wrong kind of value")]
    WrongType {
        /// Kind the verb operates on.
        expected: Kind,
        /// Kind actually stored under the key.
        actual: Kind,
    },

    /// RENAME named a source key that does not exist.
    #[error("ERR no such key")]
    NoSuchKey,

    /// Submission after SHUTDOWN completed.
    #[error("ERR database is closed")]
    DatabaseClosed,
}

impl CommandError {
    /// Render this error as the reply delivered to the submitter.
    pub fn into_reply(self) -> Reply {
        Reply::Error(self.to_string())
    }

    /// Convenience constructor for kind conflicts.
    pub fn wrong_type(expected: Kind, actual: Kind) -> Self {
        CommandError::WrongType { expected, actual }
    }
}
