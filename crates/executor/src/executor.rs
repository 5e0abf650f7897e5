//! Stateless dispatch: one [`Request`] in, one [`Reply`] out.
//!
//! The executor routes a request to its handler and folds command errors
//! into error replies. It is the only place the verb → handler mapping
//! lives; handlers stay decoupled from parsing and from each other.
//!
//! SHUTDOWN is deliberately a no-op here — the worker intercepts it to
//! run the persist-and-exit sequence. Executing it directly (as library
//! tests do) just acknowledges.

use coral_core::{CommandError, Reply};
use coral_engine::Dataset;

use crate::handlers;
use crate::request::{Action, Request};

/// Execute one request against the dataset and produce its reply.
pub fn execute(dataset: &mut Dataset, request: &Request) -> Reply {
    let args = &request.args;
    let result = match request.action {
        // Strings and key lifecycle
        Action::Get => handlers::strings::get(dataset, args),
        Action::Set => handlers::strings::set(dataset, args),
        Action::Rename => handlers::strings::rename(dataset, args),
        Action::Del => handlers::strings::del(dataset, args),

        // Lists
        Action::LPush => handlers::lists::lpush(dataset, args),
        Action::LPop => handlers::lists::lpop(dataset, args),
        Action::RPush => handlers::lists::rpush(dataset, args),
        Action::RPop => handlers::lists::rpop(dataset, args),
        Action::LLen => handlers::lists::llen(dataset, args),
        Action::LRange => handlers::lists::lrange(dataset, args),

        // Sorted sets
        Action::ZAdd => handlers::zsets::zadd(dataset, args),
        Action::ZRem => handlers::zsets::zrem(dataset, args),
        Action::ZScore => handlers::zsets::zscore(dataset, args),
        Action::ZCard => handlers::zsets::zcard(dataset, args),
        Action::ZCount => handlers::zsets::zcount(dataset, args),
        Action::ZRange => handlers::zsets::zrange(dataset, args, false),
        Action::ZRevRange => handlers::zsets::zrange(dataset, args, true),
        Action::ZRangeByScore => handlers::zsets::zrangebyscore(dataset, args, false),
        Action::ZRevRangeByScore => handlers::zsets::zrangebyscore(dataset, args, true),
        Action::ZRank => handlers::zsets::zrank(dataset, args, false),
        Action::ZRevRank => handlers::zsets::zrank(dataset, args, true),
        Action::ZRemRangeByScore => handlers::zsets::zremrangebyscore(dataset, args),
        Action::ZInterStore => handlers::zsets::zstore(dataset, args, true),
        Action::ZUnionStore => handlers::zsets::zstore(dataset, args, false),

        // Dataset-wide
        Action::Keys => handlers::server::keys(dataset, args),
        Action::FlushAll => handlers::server::flushall(dataset, args),
        Action::InfoDatasetMemory => handlers::server::info_dataset_memory(dataset, args),
        Action::Save => handlers::server::save(dataset, args),
        Action::Start => handlers::server::start(args),

        // Lifecycle: handled by the worker before dispatch.
        Action::Shutdown => Ok(Reply::Bool(true)),

        Action::Unknown => Err(CommandError::UnknownCommand),
    };
    result.unwrap_or_else(CommandError::into_reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_line;
    use coral_engine::EngineConfig;

    fn dataset() -> Dataset {
        Dataset::new(EngineConfig::new().hash_seed(1))
    }

    fn run(dataset: &mut Dataset, line: &str) -> Reply {
        match parse_line(line) {
            Ok(request) => execute(dataset, &request),
            Err(err) => err.into_reply(),
        }
    }

    #[test]
    fn test_string_scenario() {
        let mut ds = dataset();
        assert_eq!(run(&mut ds, "SET author cch"), Reply::Bool(true));
        assert_eq!(run(&mut ds, "SET author cch137"), Reply::Bool(true));
        assert_eq!(run(&mut ds, "GET author"), Reply::Str("cch137".into()));
    }

    #[test]
    fn test_unknown_command_reply() {
        let mut ds = dataset();
        assert_eq!(
            run(&mut ds, "FROBNICATE now"),
            Reply::Error("ERR unknown command".into())
        );
    }

    #[test]
    fn test_wrongtype_reply_text() {
        let mut ds = dataset();
        run(&mut ds, "LPUSH k 1");
        assert_eq!(
            run(&mut ds, "GET k"),
            Reply::Error(
                "WRONGTYPE Operation against a key holding the wrong kind of value".into()
            )
        );
    }

    #[test]
    fn test_overwrite_across_kinds_scenario() {
        let mut ds = dataset();
        assert_eq!(run(&mut ds, "LPUSH k 1"), Reply::Uint(1));
        assert_eq!(run(&mut ds, "SET k x"), Reply::Bool(true));
        assert_eq!(run(&mut ds, "GET k"), Reply::Str("x".into()));
        assert_eq!(run(&mut ds, "LLEN k"), Reply::Uint(0));
    }

    #[test]
    fn test_rename_missing_scenario() {
        let mut ds = dataset();
        assert_eq!(
            run(&mut ds, "RENAME missing other"),
            Reply::Error("ERR no such key".into())
        );
    }

    #[test]
    fn test_zset_scenario() {
        let mut ds = dataset();
        run(&mut ds, "ZADD z 1 a");
        run(&mut ds, "ZADD z 2 b");
        run(&mut ds, "ZADD z 3 c");
        assert_eq!(
            run(&mut ds, "ZRANGE z 0 -1"),
            Reply::from_strings(vec!["a".to_string(), "b".to_string(), "c".to_string()])
        );
        assert_eq!(
            run(&mut ds, "ZRANGEBYSCORE z (1 3"),
            Reply::from_strings(vec!["b".to_string(), "c".to_string()])
        );
        assert_eq!(run(&mut ds, "ZRANK z b"), Reply::Uint(1));
    }

    #[test]
    fn test_arity_error_reply() {
        let mut ds = dataset();
        assert_eq!(
            run(&mut ds, "SET lonely"),
            Reply::Error("ERR wrong arguments".into())
        );
        assert_eq!(
            run(&mut ds, "LPOP key not-a-count"),
            Reply::Error("ERR wrong arguments".into())
        );
    }

    #[test]
    fn test_start_and_flushall() {
        let mut ds = dataset();
        assert_eq!(run(&mut ds, "START"), Reply::Bool(true));
        run(&mut ds, "SET k v");
        assert_eq!(run(&mut ds, "FLUSHALL"), Reply::Bool(true));
        assert_eq!(run(&mut ds, "GET k"), Reply::Null);
        assert_eq!(run(&mut ds, "KEYS"), Reply::List(vec![]));
    }

    #[test]
    fn test_info_dataset_memory_is_uint() {
        let mut ds = dataset();
        assert!(matches!(
            run(&mut ds, "INFO_DATASET_MEMORY"),
            Reply::Uint(_)
        ));
    }
}
