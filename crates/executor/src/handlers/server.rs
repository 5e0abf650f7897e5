//! Dataset-wide verbs.

use coral_core::{CommandError, CommandResult, Reply};
use coral_engine::Dataset;
use tracing::warn;

use crate::pattern::key_matches;
use crate::request::Arg;

/// KEYS [pattern] → every key, both tables, optionally glob-filtered.
pub(crate) fn keys(dataset: &Dataset, args: &[Arg]) -> CommandResult<Reply> {
    if args.len() > 1 {
        return Err(CommandError::WrongArguments);
    }
    let pattern = match args.first() {
        Some(arg) => Some(arg.as_str().ok_or(CommandError::WrongArguments)?),
        None => None,
    };
    let items = dataset
        .keys()
        .into_iter()
        .filter(|(_, key)| pattern.map_or(true, |p| key_matches(key, p)))
        .map(|(_, key)| key);
    Ok(Reply::from_strings(items))
}

/// FLUSHALL → true; drops everything and resets the index.
pub(crate) fn flushall(dataset: &mut Dataset, args: &[Arg]) -> CommandResult<Reply> {
    if !args.is_empty() {
        return Err(CommandError::WrongArguments);
    }
    dataset.flushall();
    Ok(Reply::Bool(true))
}

/// INFO_DATASET_MEMORY → approximate bytes owned by the dataset.
pub(crate) fn info_dataset_memory(dataset: &Dataset, args: &[Arg]) -> CommandResult<Reply> {
    if !args.is_empty() {
        return Err(CommandError::WrongArguments);
    }
    Ok(Reply::Uint(dataset.memory_usage() as u64))
}

/// SAVE → true once the snapshot is written; a failed write is logged
/// and reported as false, leaving the previous snapshot untouched.
pub(crate) fn save(dataset: &Dataset, args: &[Arg]) -> CommandResult<Reply> {
    if !args.is_empty() {
        return Err(CommandError::WrongArguments);
    }
    match dataset.save() {
        Ok(()) => Ok(Reply::Bool(true)),
        Err(err) => {
            warn!(error = %err, "SAVE failed");
            Ok(Reply::Bool(false))
        }
    }
}

/// START on a running engine → acknowledged no-op.
pub(crate) fn start(args: &[Arg]) -> CommandResult<Reply> {
    if !args.is_empty() {
        return Err(CommandError::WrongArguments);
    }
    Ok(Reply::Bool(true))
}
