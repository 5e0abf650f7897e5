//! Reply union for command execution results.
//!
//! Every executed request produces exactly one `Reply`. The worker builds
//! it, hands ownership to the submitter through the reply slot, and never
//! touches it again. Errors travel the same channel: a failed command is a
//! `Reply::Error(text)`, not a Rust error.

use serde::{Deserialize, Serialize};

/// Result of executing one command.
///
/// The mapping from verb to reply variant is deterministic and documented
/// per verb in the executor; the same verb always produces the same
/// variant, only the payload differs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reply {
    /// Absent value (missing key, missing member).
    Null,
    /// Command failure with its wire text, e.g. `ERR no such key`.
    Error(String),
    /// String payload (GET).
    Str(String),
    /// Ordered sequence of nested replies (LRANGE, KEYS, ZRANGE, ...).
    List(Vec<Reply>),
    /// Unsigned count (DEL, LLEN, ZCARD, memory usage).
    Uint(u64),
    /// Signed integer.
    Int(i64),
    /// Acknowledgement (SET, SAVE, FLUSHALL, SHUTDOWN).
    Bool(bool),
    /// Floating-point payload (ZSCORE).
    Double(f64),
}

impl Reply {
    /// True unless this reply is an `Error`.
    pub fn is_ok(&self) -> bool {
        !matches!(self, Reply::Error(_))
    }

    /// Build a `List` reply out of plain strings.
    pub fn from_strings<I>(items: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Reply::List(items.into_iter().map(Reply::Str).collect())
    }

    /// Borrow the string payload, if this is a `Str` reply.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Reply::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Extract the unsigned payload, if this is a `Uint` reply.
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Reply::Uint(n) => Some(*n),
            _ => None,
        }
    }

    /// Borrow the nested replies, if this is a `List` reply.
    pub fn as_list(&self) -> Option<&[Reply]> {
        match self {
            Reply::List(items) => Some(items),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_ok() {
        assert!(Reply::Null.is_ok());
        assert!(Reply::Bool(true).is_ok());
        assert!(Reply::Uint(0).is_ok());
        assert!(!Reply::Error("ERR no such key".into()).is_ok());
    }

    #[test]
    fn test_from_strings_preserves_order() {
        let reply = Reply::from_strings(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            reply,
            Reply::List(vec![Reply::Str("a".into()), Reply::Str("b".into())])
        );
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Reply::Str("x".into()).as_str(), Some("x"));
        assert_eq!(Reply::Uint(7).as_uint(), Some(7));
        assert_eq!(Reply::Null.as_str(), None);
        assert_eq!(Reply::Null.as_uint(), None);

        let list = Reply::from_strings(vec!["a".to_string()]);
        assert_eq!(list.as_list().map(|l| l.len()), Some(1));
    }

    #[test]
    fn test_reply_serialization_round_trip() {
        let replies = vec![
            Reply::Null,
            Reply::Error("ERR wrong arguments".into()),
            Reply::Str("value".into()),
            Reply::List(vec![Reply::Str("a".into()), Reply::Uint(2)]),
            Reply::Uint(42),
            Reply::Int(-3),
            Reply::Bool(true),
            Reply::Double(1.5),
        ];

        for reply in replies {
            let json = serde_json::to_string(&reply).unwrap();
            let back: Reply = serde_json::from_str(&json).unwrap();
            assert_eq!(reply, back);
        }
    }
}
