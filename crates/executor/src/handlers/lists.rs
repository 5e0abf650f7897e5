//! List verbs.

use coral_core::{CommandError, CommandResult, Reply};
use coral_engine::Dataset;

use crate::request::Arg;

fn key_and_values<'a>(args: &'a [Arg]) -> CommandResult<(&'a str, Vec<String>)> {
    if args.len() < 2 {
        return Err(CommandError::WrongArguments);
    }
    let key = args[0].as_str().ok_or(CommandError::WrongArguments)?;
    let values = args[1..]
        .iter()
        .map(|a| {
            a.as_str()
                .map(str::to_string)
                .ok_or(CommandError::WrongArguments)
        })
        .collect::<CommandResult<_>>()?;
    Ok((key, values))
}

/// LPUSH key value… → new length.
pub(crate) fn lpush(dataset: &mut Dataset, args: &[Arg]) -> CommandResult<Reply> {
    let (key, values) = key_and_values(args)?;
    Ok(Reply::Uint(dataset.lpush(key, values)? as u64))
}

/// RPUSH key value… → new length.
pub(crate) fn rpush(dataset: &mut Dataset, args: &[Arg]) -> CommandResult<Reply> {
    let (key, values) = key_and_values(args)?;
    Ok(Reply::Uint(dataset.rpush(key, values)? as u64))
}

fn pop(dataset: &mut Dataset, args: &[Arg], head: bool) -> CommandResult<Reply> {
    if args.is_empty() || args.len() > 2 {
        return Err(CommandError::WrongArguments);
    }
    let key = args[0].as_str().ok_or(CommandError::WrongArguments)?;
    let count = match args.get(1) {
        Some(arg) => arg.as_uint().ok_or(CommandError::WrongArguments)?,
        None => 1,
    };
    let popped = if head {
        dataset.lpop(key, count)?
    } else {
        dataset.rpop(key, count)?
    };
    Ok(match popped {
        Some(items) => Reply::from_strings(items),
        None => Reply::Null,
    })
}

/// LPOP key [n] → popped elements head-first, or null when the key is
/// missing.
pub(crate) fn lpop(dataset: &mut Dataset, args: &[Arg]) -> CommandResult<Reply> {
    pop(dataset, args, true)
}

/// RPOP key [n] → popped elements tail-first, or null when the key is
/// missing.
pub(crate) fn rpop(dataset: &mut Dataset, args: &[Arg]) -> CommandResult<Reply> {
    pop(dataset, args, false)
}

/// LLEN key → length; 0 when the key is missing or not a list.
pub(crate) fn llen(dataset: &Dataset, args: &[Arg]) -> CommandResult<Reply> {
    let [key] = args else {
        return Err(CommandError::WrongArguments);
    };
    let key = key.as_str().ok_or(CommandError::WrongArguments)?;
    Ok(Reply::Uint(dataset.llen(key) as u64))
}

/// LRANGE key [start [stop]] → copies of the inclusive rank range.
/// Omitted bounds default to the whole list; `-1` coerces to "the end".
pub(crate) fn lrange(dataset: &Dataset, args: &[Arg]) -> CommandResult<Reply> {
    if args.is_empty() || args.len() > 3 {
        return Err(CommandError::WrongArguments);
    }
    let key = args[0].as_str().ok_or(CommandError::WrongArguments)?;
    let start = match args.get(1) {
        Some(arg) => arg.as_uint().ok_or(CommandError::WrongArguments)?,
        None => 0,
    };
    let stop = match args.get(2) {
        Some(arg) => arg.as_uint().ok_or(CommandError::WrongArguments)?,
        None => u64::MAX,
    };
    Ok(Reply::from_strings(dataset.lrange(key, start, stop)?))
}
