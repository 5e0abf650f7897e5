//! String and key-lifecycle verbs.

use coral_core::{CommandError, CommandResult, Reply};
use coral_engine::Dataset;

use crate::request::Arg;

/// GET key → string copy, or null when missing.
pub(crate) fn get(dataset: &Dataset, args: &[Arg]) -> CommandResult<Reply> {
    let [key] = args else {
        return Err(CommandError::WrongArguments);
    };
    let key = key.as_str().ok_or(CommandError::WrongArguments)?;
    Ok(match dataset.get(key)? {
        Some(value) => Reply::Str(value),
        None => Reply::Null,
    })
}

/// SET key value → true. Overwrites entries of any kind.
pub(crate) fn set(dataset: &mut Dataset, args: &[Arg]) -> CommandResult<Reply> {
    let [key, value] = args else {
        return Err(CommandError::WrongArguments);
    };
    let key = key.as_str().ok_or(CommandError::WrongArguments)?;
    let value = value.as_str().ok_or(CommandError::WrongArguments)?;
    dataset.set(key, value.to_string());
    Ok(Reply::Bool(true))
}

/// RENAME old new → true, or "no such key".
pub(crate) fn rename(dataset: &mut Dataset, args: &[Arg]) -> CommandResult<Reply> {
    let [old, new] = args else {
        return Err(CommandError::WrongArguments);
    };
    let old = old.as_str().ok_or(CommandError::WrongArguments)?;
    let new = new.as_str().ok_or(CommandError::WrongArguments)?;
    dataset.rename(old, new)?;
    Ok(Reply::Bool(true))
}

/// DEL key… → count of keys actually deleted.
pub(crate) fn del(dataset: &mut Dataset, args: &[Arg]) -> CommandResult<Reply> {
    if args.is_empty() {
        return Err(CommandError::WrongArguments);
    }
    let keys: Vec<&str> = args
        .iter()
        .map(|a| a.as_str().ok_or(CommandError::WrongArguments))
        .collect::<CommandResult<_>>()?;
    let mut deleted = 0u64;
    for key in keys {
        if dataset.del(key) {
            deleted += 1;
        }
    }
    Ok(Reply::Uint(deleted))
}
