//! Value kind tags.
//!
//! Every stored entry carries exactly one of `String`, `List` or
//! `SortedSet`. `Number` exists only as a command-argument tag: verbs such
//! as `LPOP count` coerce string arguments into numbers on demand, but no
//! entry is ever stored with a numeric kind.

use serde::{Deserialize, Serialize};

/// Discriminant for the value stored in (or passed to) the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// UTF-8 string payload.
    String,
    /// Doubly-linked list of strings.
    List,
    /// Score-ordered set of unique members.
    SortedSet,
    /// Numeric command argument; never a stored kind.
    Number,
}

impl Kind {
    /// Short lowercase label used in log events and the KEYS listing.
    pub fn label(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::List => "list",
            Kind::SortedSet => "zset",
            Kind::Number => "number",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(Kind::String.label(), "string");
        assert_eq!(Kind::List.label(), "list");
        assert_eq!(Kind::SortedSet.label(), "zset");
        assert_eq!(Kind::Number.label(), "number");
    }

    #[test]
    fn test_kind_display_matches_label() {
        for kind in [Kind::String, Kind::List, Kind::SortedSet, Kind::Number] {
            assert_eq!(kind.to_string(), kind.label());
        }
    }
}
