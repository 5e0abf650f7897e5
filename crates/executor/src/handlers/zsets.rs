//! Sorted-set verbs.

use coral_core::{CommandError, CommandResult, Reply};
use coral_engine::Dataset;
use coral_storage::zset::{Aggregate, ScoreRange};

use crate::request::Arg;

/// Parse a plain score (ZADD). Finite doubles only.
fn parse_score(arg: &Arg) -> CommandResult<f64> {
    arg.as_double().ok_or(CommandError::WrongArguments)
}

/// Parse a score-range endpoint: optional `(` prefix for exclusivity,
/// `-inf` / `+inf` / `inf` accepted.
fn parse_bound(arg: &Arg) -> CommandResult<(f64, bool)> {
    match arg {
        Arg::Str(text) => {
            let trimmed = text.trim();
            let (body, inclusive) = match trimmed.strip_prefix('(') {
                Some(rest) => (rest, false),
                None => (trimmed, true),
            };
            let value = if body.eq_ignore_ascii_case("-inf") {
                f64::NEG_INFINITY
            } else if body.eq_ignore_ascii_case("inf") || body.eq_ignore_ascii_case("+inf") {
                f64::INFINITY
            } else {
                body.parse::<f64>()
                    .ok()
                    .filter(|v| !v.is_nan())
                    .ok_or(CommandError::WrongArguments)?
            };
            Ok((value, inclusive))
        }
        other => other
            .as_double()
            .map(|v| (v, true))
            .ok_or(CommandError::WrongArguments),
    }
}

fn parse_range(min: &Arg, max: &Arg) -> CommandResult<ScoreRange> {
    let (min, min_inclusive) = parse_bound(min)?;
    let (max, max_inclusive) = parse_bound(max)?;
    Ok(ScoreRange::new(min, min_inclusive, max, max_inclusive))
}

/// ZADD key score member [score member …] → number of new members.
pub(crate) fn zadd(dataset: &mut Dataset, args: &[Arg]) -> CommandResult<Reply> {
    if args.len() < 3 || args.len() % 2 == 0 {
        return Err(CommandError::WrongArguments);
    }
    let key = args[0].as_str().ok_or(CommandError::WrongArguments)?;
    let mut pairs = Vec::with_capacity(args.len() / 2);
    for pair in args[1..].chunks(2) {
        let score = parse_score(&pair[0])?;
        let member = pair[1].as_str().ok_or(CommandError::WrongArguments)?;
        pairs.push((score, member.to_string()));
    }
    Ok(Reply::Uint(dataset.zadd(key, pairs)?))
}

/// ZREM key member… → number removed.
pub(crate) fn zrem(dataset: &mut Dataset, args: &[Arg]) -> CommandResult<Reply> {
    if args.len() < 2 {
        return Err(CommandError::WrongArguments);
    }
    let key = args[0].as_str().ok_or(CommandError::WrongArguments)?;
    let members: Vec<&str> = args[1..]
        .iter()
        .map(|a| a.as_str().ok_or(CommandError::WrongArguments))
        .collect::<CommandResult<_>>()?;
    Ok(Reply::Uint(dataset.zrem(key, &members)?))
}

/// ZSCORE key member → score or null.
pub(crate) fn zscore(dataset: &Dataset, args: &[Arg]) -> CommandResult<Reply> {
    let [key, member] = args else {
        return Err(CommandError::WrongArguments);
    };
    let key = key.as_str().ok_or(CommandError::WrongArguments)?;
    let member = member.as_str().ok_or(CommandError::WrongArguments)?;
    Ok(match dataset.zscore(key, member)? {
        Some(score) => Reply::Double(score),
        None => Reply::Null,
    })
}

/// ZCARD key → cardinality.
pub(crate) fn zcard(dataset: &Dataset, args: &[Arg]) -> CommandResult<Reply> {
    let [key] = args else {
        return Err(CommandError::WrongArguments);
    };
    let key = key.as_str().ok_or(CommandError::WrongArguments)?;
    Ok(Reply::Uint(dataset.zcard(key)? as u64))
}

/// ZCOUNT key min max → members inside the score range.
pub(crate) fn zcount(dataset: &Dataset, args: &[Arg]) -> CommandResult<Reply> {
    let [key, min, max] = args else {
        return Err(CommandError::WrongArguments);
    };
    let key = key.as_str().ok_or(CommandError::WrongArguments)?;
    let range = parse_range(min, max)?;
    Ok(Reply::Uint(dataset.zcount(key, range)? as u64))
}

/// ZRANGE / ZREVRANGE key start stop → members by rank range.
pub(crate) fn zrange(dataset: &Dataset, args: &[Arg], reverse: bool) -> CommandResult<Reply> {
    let [key, start, stop] = args else {
        return Err(CommandError::WrongArguments);
    };
    let key = key.as_str().ok_or(CommandError::WrongArguments)?;
    let start = start.as_uint().ok_or(CommandError::WrongArguments)?;
    let stop = stop.as_uint().ok_or(CommandError::WrongArguments)?;
    Ok(Reply::from_strings(dataset.zrange(key, start, stop, reverse)?))
}

/// ZRANGEBYSCORE / ZREVRANGEBYSCORE key min max → members by score range.
pub(crate) fn zrangebyscore(
    dataset: &Dataset,
    args: &[Arg],
    reverse: bool,
) -> CommandResult<Reply> {
    let [key, min, max] = args else {
        return Err(CommandError::WrongArguments);
    };
    let key = key.as_str().ok_or(CommandError::WrongArguments)?;
    let range = parse_range(min, max)?;
    Ok(Reply::from_strings(
        dataset.zrangebyscore(key, range, reverse)?,
    ))
}

/// ZRANK / ZREVRANK key member → 0-based rank or null.
pub(crate) fn zrank(dataset: &Dataset, args: &[Arg], reverse: bool) -> CommandResult<Reply> {
    let [key, member] = args else {
        return Err(CommandError::WrongArguments);
    };
    let key = key.as_str().ok_or(CommandError::WrongArguments)?;
    let member = member.as_str().ok_or(CommandError::WrongArguments)?;
    Ok(match dataset.zrank(key, member, reverse)? {
        Some(rank) => Reply::Uint(rank as u64),
        None => Reply::Null,
    })
}

/// ZREMRANGEBYSCORE key min max → number removed.
pub(crate) fn zremrangebyscore(dataset: &mut Dataset, args: &[Arg]) -> CommandResult<Reply> {
    let [key, min, max] = args else {
        return Err(CommandError::WrongArguments);
    };
    let key = key.as_str().ok_or(CommandError::WrongArguments)?;
    let range = parse_range(min, max)?;
    Ok(Reply::Uint(dataset.zremrangebyscore(key, range)?))
}

/// ZINTERSTORE / ZUNIONSTORE dest numkeys key… [WEIGHTS w…]
/// [AGGREGATE SUM|MIN|MAX] → destination cardinality.
pub(crate) fn zstore(
    dataset: &mut Dataset,
    args: &[Arg],
    intersect: bool,
) -> CommandResult<Reply> {
    if args.len() < 3 {
        return Err(CommandError::WrongArguments);
    }
    let dest = args[0].as_str().ok_or(CommandError::WrongArguments)?;
    let numkeys = args[1].as_uint().ok_or(CommandError::WrongArguments)? as usize;
    if numkeys == 0 || args.len() - 2 < numkeys {
        return Err(CommandError::WrongArguments);
    }
    let sources: Vec<&str> = args[2..2 + numkeys]
        .iter()
        .map(|a| a.as_str().ok_or(CommandError::WrongArguments))
        .collect::<CommandResult<_>>()?;

    let mut weights: Vec<f64> = Vec::new();
    let mut aggregate = Aggregate::Sum;
    let mut rest = &args[2 + numkeys..];
    while !rest.is_empty() {
        let clause = rest[0].as_str().ok_or(CommandError::WrongArguments)?;
        if clause.eq_ignore_ascii_case("WEIGHTS") {
            if rest.len() <= numkeys {
                return Err(CommandError::WrongArguments);
            }
            weights = rest[1..1 + numkeys]
                .iter()
                .map(|a| a.as_double().ok_or(CommandError::WrongArguments))
                .collect::<CommandResult<_>>()?;
            rest = &rest[1 + numkeys..];
        } else if clause.eq_ignore_ascii_case("AGGREGATE") {
            let token = rest
                .get(1)
                .and_then(Arg::as_str)
                .ok_or(CommandError::WrongArguments)?;
            aggregate = Aggregate::parse(token).ok_or(CommandError::WrongArguments)?;
            rest = &rest[2..];
        } else {
            return Err(CommandError::WrongArguments);
        }
    }

    let card = dataset.zstore(dest, &sources, &weights, aggregate, intersect)?;
    Ok(Reply::Uint(card))
}

#[cfg(test)]
mod tests {
    use super::*;
    use coral_engine::EngineConfig;

    fn dataset() -> Dataset {
        Dataset::new(EngineConfig::new().hash_seed(1))
    }

    fn str_args(items: &[&str]) -> Vec<Arg> {
        items.iter().map(|s| Arg::from(*s)).collect()
    }

    fn list_reply(items: &[&str]) -> Reply {
        Reply::from_strings(items.iter().map(|s| s.to_string()))
    }

    fn seeded() -> Dataset {
        let mut ds = dataset();
        zadd(&mut ds, &str_args(&["z", "1", "a", "2", "b", "3", "c"])).unwrap();
        ds
    }

    #[test]
    fn test_zadd_and_zrange_to_end() {
        let ds = seeded();
        assert_eq!(
            zrange(&ds, &str_args(&["z", "0", "-1"]), false).unwrap(),
            list_reply(&["a", "b", "c"])
        );
    }

    #[test]
    fn test_zrangebyscore_exclusive_min() {
        let ds = seeded();
        assert_eq!(
            zrangebyscore(&ds, &str_args(&["z", "(1", "3"]), false).unwrap(),
            list_reply(&["b", "c"])
        );
    }

    #[test]
    fn test_zrangebyscore_infinities() {
        let ds = seeded();
        assert_eq!(
            zrangebyscore(&ds, &str_args(&["z", "-inf", "+inf"]), false).unwrap(),
            list_reply(&["a", "b", "c"])
        );
        assert_eq!(
            zrangebyscore(&ds, &str_args(&["z", "-inf", "(2"]), false).unwrap(),
            list_reply(&["a"])
        );
    }

    #[test]
    fn test_zrank_and_zrevrank() {
        let ds = seeded();
        assert_eq!(
            zrank(&ds, &str_args(&["z", "b"]), false).unwrap(),
            Reply::Uint(1)
        );
        assert_eq!(
            zrank(&ds, &str_args(&["z", "a"]), true).unwrap(),
            Reply::Uint(2)
        );
        assert_eq!(
            zrank(&ds, &str_args(&["z", "ghost"]), false).unwrap(),
            Reply::Null
        );
    }

    #[test]
    fn test_zscore_zcard_zcount() {
        let ds = seeded();
        assert_eq!(
            zscore(&ds, &str_args(&["z", "b"])).unwrap(),
            Reply::Double(2.0)
        );
        assert_eq!(zscore(&ds, &str_args(&["z", "x"])).unwrap(), Reply::Null);
        assert_eq!(zcard(&ds, &str_args(&["z"])).unwrap(), Reply::Uint(3));
        assert_eq!(
            zcount(&ds, &str_args(&["z", "(1", "3"])).unwrap(),
            Reply::Uint(2)
        );
    }

    #[test]
    fn test_zrem_and_zremrangebyscore() {
        let mut ds = seeded();
        assert_eq!(
            zrem(&mut ds, &str_args(&["z", "b", "ghost"])).unwrap(),
            Reply::Uint(1)
        );
        assert_eq!(
            zremrangebyscore(&mut ds, &str_args(&["z", "1", "1"])).unwrap(),
            Reply::Uint(1)
        );
        assert_eq!(zcard(&ds, &str_args(&["z"])).unwrap(), Reply::Uint(1));
    }

    #[test]
    fn test_zinterstore_scenario() {
        let mut ds = dataset();
        zadd(&mut ds, &str_args(&["z1", "1", "a", "2", "b", "3", "c"])).unwrap();
        zadd(&mut ds, &str_args(&["z2", "10", "b", "20", "c", "30", "d"])).unwrap();
        assert_eq!(
            zstore(
                &mut ds,
                &str_args(&["out", "2", "z1", "z2", "AGGREGATE", "SUM"]),
                true
            )
            .unwrap(),
            Reply::Uint(2)
        );
        assert_eq!(
            zscore(&ds, &str_args(&["out", "b"])).unwrap(),
            Reply::Double(12.0)
        );
        assert_eq!(
            zscore(&ds, &str_args(&["out", "c"])).unwrap(),
            Reply::Double(23.0)
        );
    }

    #[test]
    fn test_zunionstore_with_weights() {
        let mut ds = dataset();
        zadd(&mut ds, &str_args(&["z1", "1", "a", "2", "b"])).unwrap();
        zadd(&mut ds, &str_args(&["z2", "3", "b", "4", "c"])).unwrap();
        assert_eq!(
            zstore(
                &mut ds,
                &str_args(&["out", "2", "z1", "z2", "WEIGHTS", "2", "1"]),
                false
            )
            .unwrap(),
            Reply::Uint(3)
        );
        assert_eq!(
            zscore(&ds, &str_args(&["out", "b"])).unwrap(),
            Reply::Double(7.0)
        );
    }

    #[test]
    fn test_zstore_argument_errors() {
        let mut ds = dataset();
        // numkeys of zero, too few keys, bad clause, bad aggregate.
        assert!(zstore(&mut ds, &str_args(&["out", "0", "z1"]), true).is_err());
        assert!(zstore(&mut ds, &str_args(&["out", "3", "z1", "z2"]), true).is_err());
        assert!(zstore(&mut ds, &str_args(&["out", "1", "z1", "BOGUS"]), true).is_err());
        assert!(zstore(
            &mut ds,
            &str_args(&["out", "1", "z1", "AGGREGATE", "AVG"]),
            true
        )
        .is_err());
        assert!(zstore(
            &mut ds,
            &str_args(&["out", "2", "z1", "z2", "WEIGHTS", "1"]),
            true
        )
        .is_err());
    }

    #[test]
    fn test_zadd_arity() {
        let mut ds = dataset();
        assert!(zadd(&mut ds, &str_args(&["z"])).is_err());
        assert!(zadd(&mut ds, &str_args(&["z", "1"])).is_err());
        assert!(zadd(&mut ds, &str_args(&["z", "1", "a", "2"])).is_err());
        assert!(zadd(&mut ds, &str_args(&["z", "NaN", "a"])).is_err());
    }
}
