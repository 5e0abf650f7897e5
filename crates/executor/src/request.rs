//! Request model: the instruction set of the engine.
//!
//! A [`Request`] is an [`Action`] verb plus ordered arguments. Arguments
//! arrive from the parser as strings and are coerced on demand by the
//! verbs that need numbers; the structured [`Request::new`] path may pass
//! numeric arguments directly.

/// Command verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Persist the dataset to the snapshot file.
    Save,
    /// Acknowledged no-op once the engine is running.
    Start,
    /// Store a string.
    Set,
    /// Fetch a string.
    Get,
    /// Re-file an entry under a new key.
    Rename,
    /// Delete keys.
    Del,
    /// Push onto a list head.
    LPush,
    /// Pop from a list head.
    LPop,
    /// Push onto a list tail.
    RPush,
    /// Pop from a list tail.
    RPop,
    /// List length.
    LLen,
    /// Copy a list rank range.
    LRange,
    /// List keys, optionally filtered by a glob pattern.
    Keys,
    /// Delete everything.
    FlushAll,
    /// Report dataset memory usage. Passive: does not reset the worker's
    /// idle back-off.
    InfoDatasetMemory,
    /// Persist and stop the worker.
    Shutdown,
    /// Add sorted-set members.
    ZAdd,
    /// Remove sorted-set members.
    ZRem,
    /// Score of a member.
    ZScore,
    /// Sorted-set cardinality.
    ZCard,
    /// Count members in a score range.
    ZCount,
    /// Members by rank range, ascending.
    ZRange,
    /// Members by rank range, descending.
    ZRevRange,
    /// Members by score range, ascending.
    ZRangeByScore,
    /// Members by score range, descending.
    ZRevRangeByScore,
    /// Rank of a member, ascending.
    ZRank,
    /// Rank of a member, descending.
    ZRevRank,
    /// Remove members in a score range.
    ZRemRangeByScore,
    /// Store the weighted intersection of sorted sets.
    ZInterStore,
    /// Store the weighted union of sorted sets.
    ZUnionStore,
    /// Unrecognised verb; executes to an error reply.
    Unknown,
}

const VERB_TABLE: &[(&str, Action)] = &[
    ("SAVE", Action::Save),
    ("START", Action::Start),
    ("SET", Action::Set),
    ("GET", Action::Get),
    ("RENAME", Action::Rename),
    ("DEL", Action::Del),
    ("LPUSH", Action::LPush),
    ("LPOP", Action::LPop),
    ("RPUSH", Action::RPush),
    ("RPOP", Action::RPop),
    ("LLEN", Action::LLen),
    ("LRANGE", Action::LRange),
    ("KEYS", Action::Keys),
    ("FLUSHALL", Action::FlushAll),
    ("INFO_DATASET_MEMORY", Action::InfoDatasetMemory),
    ("SHUTDOWN", Action::Shutdown),
    ("ZADD", Action::ZAdd),
    ("ZREM", Action::ZRem),
    ("ZSCORE", Action::ZScore),
    ("ZCARD", Action::ZCard),
    ("ZCOUNT", Action::ZCount),
    ("ZRANGE", Action::ZRange),
    ("ZREVRANGE", Action::ZRevRange),
    ("ZRANGEBYSCORE", Action::ZRangeByScore),
    ("ZREVRANGEBYSCORE", Action::ZRevRangeByScore),
    ("ZRANK", Action::ZRank),
    ("ZREVRANK", Action::ZRevRank),
    ("ZREMRANGEBYSCORE", Action::ZRemRangeByScore),
    ("ZINTERSTORE", Action::ZInterStore),
    ("ZUNIONSTORE", Action::ZUnionStore),
];

impl Action {
    /// Resolve a verb token, case-insensitively. Unrecognised tokens map
    /// to [`Action::Unknown`].
    pub fn from_verb(token: &str) -> Action {
        for (name, action) in VERB_TABLE {
            if token.eq_ignore_ascii_case(name) {
                return *action;
            }
        }
        Action::Unknown
    }

    /// Canonical verb name, for logs.
    pub fn verb(&self) -> &'static str {
        for (name, action) in VERB_TABLE {
            if action == self {
                return name;
            }
        }
        "UNKNOWN"
    }
}

/// One command argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    /// String argument (keys, values, members, clause words).
    Str(String),
    /// Unsigned numeric argument.
    Uint(u64),
    /// Signed numeric argument.
    Int(i64),
}

impl Arg {
    /// Borrow the string form. Numeric arguments have none: keys and
    /// values must be strings.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Arg::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Coerce to unsigned, strtoul-style: decimal, whitespace-trimmed,
    /// with a leading `-` wrapping modulo 2^64 (so `-1` means the
    /// unsigned maximum, "to the end").
    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Arg::Uint(v) => Some(*v),
            Arg::Int(v) => Some(*v as u64),
            Arg::Str(s) => parse_u64_wrapping(s),
        }
    }

    /// Coerce to signed.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Arg::Int(v) => Some(*v),
            Arg::Uint(v) => i64::try_from(*v).ok(),
            Arg::Str(s) => s.trim().parse().ok(),
        }
    }

    /// Coerce to a finite double (NaN is rejected).
    pub fn as_double(&self) -> Option<f64> {
        let value = match self {
            Arg::Uint(v) => *v as f64,
            Arg::Int(v) => *v as f64,
            Arg::Str(s) => s.trim().parse().ok()?,
        };
        (!value.is_nan()).then_some(value)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Str(s.to_string())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Str(s)
    }
}

impl From<u64> for Arg {
    fn from(v: u64) -> Self {
        Arg::Uint(v)
    }
}

impl From<i64> for Arg {
    fn from(v: i64) -> Self {
        Arg::Int(v)
    }
}

/// Decimal unsigned parse with strtoul's negation behaviour: `-n` wraps
/// to `2^64 - n`.
pub(crate) fn parse_u64_wrapping(s: &str) -> Option<u64> {
    let trimmed = s.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u64 = digits.parse().ok()?;
    Some(if negative { value.wrapping_neg() } else { value })
}

/// A parsed command: an action plus its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// The verb.
    pub action: Action,
    /// Ordered arguments.
    pub args: Vec<Arg>,
}

impl Request {
    /// Build a request directly, bypassing the parser.
    pub fn new(action: Action, args: Vec<Arg>) -> Self {
        Request { action, args }
    }
}
