//! The keyed dataset: the only mutator of the hash index.
//!
//! Every verb's data semantics live here, expressed over the storage
//! structures. The executor validates arity and coerces arguments, then
//! calls one method per verb; this module enforces kind rules and the
//! create/overwrite/delete lifecycle:
//!
//! - a write verb that first names a key creates the entry
//! - the same verb against the same kind mutates in place
//! - SET overwrites wholesale, replacing the kind
//! - DEL, FLUSHALL and kind-mismatching overwrites destroy entries
//!
//! One deliberate asymmetry: `llen` on a key of the wrong kind reports 0
//! (a missing list) instead of a kind error, while the other list verbs
//! reject with WRONGTYPE.

use coral_core::{CommandError, CommandResult, Kind};
use coral_durability::{read_snapshot, write_snapshot, SnapshotValue};
use coral_storage::zset::{self, Aggregate, ScoreRange};
use coral_storage::{DList, Entry, HashIndex, Object, ZSet};
use tracing::info;

use crate::config::EngineConfig;
use crate::error::EngineError;

/// In-memory dataset with optional JSON-file persistence.
#[derive(Debug)]
pub struct Dataset {
    index: HashIndex,
    config: EngineConfig,
}

impl Dataset {
    /// Create an empty dataset under `config`, without touching disk.
    pub fn new(config: EngineConfig) -> Self {
        Dataset {
            index: HashIndex::with_seed(config.resolved_seed()),
            config,
        }
    }

    /// Create a dataset and seed it from the configured snapshot file.
    pub fn open(config: EngineConfig) -> Result<Self, EngineError> {
        let mut dataset = Dataset::new(config);
        dataset.load()?;
        Ok(dataset)
    }

    /// The configuration this dataset was opened with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when no entries exist.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// One maintenance tick: load check or a single rehash step.
    pub fn maintenance(&mut self) {
        self.index.maintenance();
    }

    // =====================================================================
    // Strings
    // =====================================================================

    /// Copy of the string stored under `key`.
    pub fn get(&self, key: &str) -> CommandResult<Option<String>> {
        match self.index.get(key) {
            None => Ok(None),
            Some(entry) => match entry.value.as_str() {
                Some(s) => Ok(Some(s.to_string())),
                None => Err(CommandError::wrong_type(Kind::String, entry.kind())),
            },
        }
    }

    /// Store `value` under `key`, overwriting any prior entry regardless
    /// of kind.
    pub fn set(&mut self, key: &str, value: String) {
        match self.index.get_mut(key) {
            Some(entry) => entry.value = Object::Str(value),
            None => self.index.insert(Entry::new(key, Object::Str(value))),
        }
    }

    /// Re-file the entry under a new key, overwriting any entry already
    /// stored there.
    pub fn rename(&mut self, old: &str, new: &str) -> CommandResult<()> {
        let Some(mut entry) = self.index.remove(old) else {
            return Err(CommandError::NoSuchKey);
        };
        self.index.remove(new);
        entry.key = new.to_string();
        self.index.insert(entry);
        Ok(())
    }

    /// Delete one key; true if it existed.
    pub fn del(&mut self, key: &str) -> bool {
        self.index.remove(key).is_some()
    }

    // =====================================================================
    // Lists
    // =====================================================================

    fn list_entry(&self, key: &str) -> CommandResult<Option<&DList>> {
        match self.index.get(key) {
            None => Ok(None),
            Some(entry) => match entry.value.as_list() {
                Some(list) => Ok(Some(list)),
                None => Err(CommandError::wrong_type(Kind::List, entry.kind())),
            },
        }
    }

    fn list_entry_mut(&mut self, key: &str, create: bool) -> CommandResult<Option<&mut DList>> {
        match self.index.get(key).map(|e| e.kind()) {
            Some(Kind::List) => {}
            Some(other) => return Err(CommandError::wrong_type(Kind::List, other)),
            None if create => self.index.insert(Entry::new(key, Object::List(DList::new()))),
            None => return Ok(None),
        }
        Ok(self.index.get_mut(key).and_then(|e| e.value.as_list_mut()))
    }

    /// Push values onto the head; returns the new length.
    pub fn lpush(&mut self, key: &str, values: Vec<String>) -> CommandResult<u32> {
        match self.list_entry_mut(key, true)? {
            Some(list) => Ok(list.lpush(values)),
            None => Ok(0),
        }
    }

    /// Push values onto the tail; returns the new length.
    pub fn rpush(&mut self, key: &str, values: Vec<String>) -> CommandResult<u32> {
        match self.list_entry_mut(key, true)? {
            Some(list) => Ok(list.rpush(values)),
            None => Ok(0),
        }
    }

    /// Pop up to `count` elements from the head; `None` for a missing
    /// key. Popping a list to empty keeps the entry.
    pub fn lpop(&mut self, key: &str, count: u64) -> CommandResult<Option<Vec<String>>> {
        Ok(self.list_entry_mut(key, false)?.map(|list| list.lpop(count)))
    }

    /// Pop up to `count` elements from the tail, tail-first; `None` for a
    /// missing key.
    pub fn rpop(&mut self, key: &str, count: u64) -> CommandResult<Option<Vec<String>>> {
        Ok(self.list_entry_mut(key, false)?.map(|list| list.rpop(count)))
    }

    /// Length of the list under `key`; 0 when missing or not a list.
    pub fn llen(&self, key: &str) -> u32 {
        self.index
            .get(key)
            .and_then(|e| e.value.as_list())
            .map_or(0, DList::len)
    }

    /// Copy the inclusive rank range; empty for a missing key.
    pub fn lrange(&self, key: &str, start: u64, stop: u64) -> CommandResult<Vec<String>> {
        Ok(self
            .list_entry(key)?
            .map(|list| list.lrange(start, stop))
            .unwrap_or_default())
    }

    // =====================================================================
    // Sorted sets
    // =====================================================================

    fn zset_entry(&self, key: &str) -> CommandResult<Option<&ZSet>> {
        match self.index.get(key) {
            None => Ok(None),
            Some(entry) => match entry.value.as_zset() {
                Some(zset) => Ok(Some(zset)),
                None => Err(CommandError::wrong_type(Kind::SortedSet, entry.kind())),
            },
        }
    }

    fn zset_entry_mut(&mut self, key: &str, create: bool) -> CommandResult<Option<&mut ZSet>> {
        match self.index.get(key).map(|e| e.kind()) {
            Some(Kind::SortedSet) => {}
            Some(other) => return Err(CommandError::wrong_type(Kind::SortedSet, other)),
            None if create => self.index.insert(Entry::new(key, Object::ZSet(ZSet::new()))),
            None => return Ok(None),
        }
        Ok(self.index.get_mut(key).and_then(|e| e.value.as_zset_mut()))
    }

    /// Add or update `(score, member)` pairs; returns the number of new
    /// members.
    pub fn zadd(&mut self, key: &str, pairs: Vec<(f64, String)>) -> CommandResult<u64> {
        match self.zset_entry_mut(key, true)? {
            Some(zset) => {
                let mut added = 0;
                for (score, member) in pairs {
                    if zset.zadd(score, &member) {
                        added += 1;
                    }
                }
                Ok(added)
            }
            None => Ok(0),
        }
    }

    /// Remove members; returns the number removed. Removing the last
    /// member deletes the key.
    pub fn zrem(&mut self, key: &str, members: &[&str]) -> CommandResult<u64> {
        let (removed, emptied) = match self.zset_entry_mut(key, false)? {
            None => return Ok(0),
            Some(zset) => {
                let mut removed = 0;
                for member in members {
                    if zset.zrem(member) {
                        removed += 1;
                    }
                }
                (removed, zset.is_empty())
            }
        };
        if emptied {
            self.index.remove(key);
        }
        Ok(removed)
    }

    /// Score of `member`, if the key and member exist.
    pub fn zscore(&self, key: &str, member: &str) -> CommandResult<Option<f64>> {
        Ok(self.zset_entry(key)?.and_then(|z| z.zscore(member)))
    }

    /// Cardinality; 0 for a missing key.
    pub fn zcard(&self, key: &str) -> CommandResult<u32> {
        Ok(self.zset_entry(key)?.map_or(0, ZSet::zcard))
    }

    /// Count members with scores inside `range`; 0 for a missing key.
    pub fn zcount(&self, key: &str, range: ScoreRange) -> CommandResult<u32> {
        Ok(self.zset_entry(key)?.map_or(0, |z| z.zcount(range)))
    }

    /// Members at the inclusive rank range, under the requested
    /// direction. `u64::MAX` (from `-1` under unsigned coercion) means
    /// "last".
    pub fn zrange(
        &self,
        key: &str,
        start: u64,
        stop: u64,
        reverse: bool,
    ) -> CommandResult<Vec<String>> {
        let Some(zset) = self.zset_entry(key)? else {
            return Ok(Vec::new());
        };
        let len = zset.zcard();
        if len == 0 {
            return Ok(Vec::new());
        }
        let last = (len - 1) as u64;
        let stop = stop.min(last);
        if start > stop {
            return Ok(Vec::new());
        }
        let (start, stop) = (start as u32, stop as u32);
        if reverse {
            let mut members = zset.range_by_rank(len - 1 - stop, len - 1 - start);
            members.reverse();
            Ok(members)
        } else {
            Ok(zset.range_by_rank(start, stop))
        }
    }

    /// Members with scores inside `range`, under the requested direction.
    pub fn zrangebyscore(
        &self,
        key: &str,
        range: ScoreRange,
        reverse: bool,
    ) -> CommandResult<Vec<String>> {
        let Some(zset) = self.zset_entry(key)? else {
            return Ok(Vec::new());
        };
        let mut members = zset.range_by_score(range);
        if reverse {
            members.reverse();
        }
        Ok(members)
    }

    /// 0-based rank of `member` under the requested direction.
    pub fn zrank(&self, key: &str, member: &str, reverse: bool) -> CommandResult<Option<u32>> {
        Ok(self.zset_entry(key)?.and_then(|z| z.zrank(member, reverse)))
    }

    /// Remove members with scores inside `range`; returns the number
    /// removed. Emptying the set deletes the key.
    pub fn zremrangebyscore(&mut self, key: &str, range: ScoreRange) -> CommandResult<u64> {
        let (removed, emptied) = match self.zset_entry_mut(key, false)? {
            None => return Ok(0),
            Some(zset) => {
                let removed = zset.zremrangebyscore(range);
                (removed as u64, zset.is_empty())
            }
        };
        if emptied {
            self.index.remove(key);
        }
        Ok(removed)
    }

    /// Aggregate `sources` into `dest` (intersection or union), returning
    /// the destination cardinality. Missing sources are empty sets; an
    /// empty result deletes `dest` instead of storing an empty set.
    pub fn zstore(
        &mut self,
        dest: &str,
        sources: &[&str],
        weights: &[f64],
        agg: Aggregate,
        intersect: bool,
    ) -> CommandResult<u64> {
        let output = {
            let mut resolved: Vec<(Option<&ZSet>, f64)> = Vec::with_capacity(sources.len());
            for (i, key) in sources.iter().enumerate() {
                let weight = weights.get(i).copied().unwrap_or(1.0);
                match self.index.get(key) {
                    None => resolved.push((None, weight)),
                    Some(entry) => match entry.value.as_zset() {
                        Some(zset) => resolved.push((Some(zset), weight)),
                        None => {
                            return Err(CommandError::wrong_type(Kind::SortedSet, entry.kind()))
                        }
                    },
                }
            }
            let present: Vec<(&ZSet, f64)> = resolved
                .iter()
                .filter_map(|&(zset, weight)| zset.map(|z| (z, weight)))
                .collect();
            if intersect {
                if present.len() < resolved.len() {
                    ZSet::new()
                } else {
                    zset::zinter(&present, agg)
                }
            } else {
                zset::zunion(&present, agg)
            }
        };

        let card = output.zcard() as u64;
        if card == 0 {
            self.index.remove(dest);
        } else {
            match self.index.get_mut(dest) {
                Some(entry) => entry.value = Object::ZSet(output),
                None => self.index.insert(Entry::new(dest, Object::ZSet(output))),
            }
        }
        Ok(card)
    }

    // =====================================================================
    // Dataset-wide
    // =====================================================================

    /// `(kind, key)` for every live entry, both tables included.
    pub fn keys(&self) -> Vec<(Kind, String)> {
        self.index.iter().map(|e| (e.kind(), e.key.clone())).collect()
    }

    /// Drop every entry and return the index to its initial size.
    pub fn flushall(&mut self) {
        self.index.reset();
    }

    /// Approximate bytes owned by the dataset.
    pub fn memory_usage(&self) -> usize {
        self.index.memory_usage()
    }

    // =====================================================================
    // Persistence
    // =====================================================================

    fn load(&mut self) -> Result<(), EngineError> {
        let entries = read_snapshot(&self.config.persistence_path)?;
        let count = entries.len();
        for (key, value) in entries {
            let object = match value {
                SnapshotValue::Str(s) => Object::Str(s),
                SnapshotValue::List(items) => Object::List(items.into_iter().collect()),
                SnapshotValue::Sorted(pairs) => {
                    let mut zset = ZSet::new();
                    for (member, score) in pairs {
                        zset.zadd(score, &member);
                    }
                    Object::ZSet(zset)
                }
            };
            match self.index.get_mut(&key) {
                Some(entry) => entry.value = object,
                None => self.index.insert(Entry::new(key, object)),
            }
            // Large snapshots trigger resizing naturally.
            self.index.maintenance();
        }
        info!(
            entries = count,
            path = %self.config.persistence_path.display(),
            "snapshot loaded"
        );
        Ok(())
    }

    /// Serialize the current index state to the configured path.
    pub fn save(&self) -> Result<(), EngineError> {
        write_snapshot(
            &self.config.persistence_path,
            self.index.iter().map(|entry| {
                let value = match &entry.value {
                    Object::Str(s) => SnapshotValue::Str(s.clone()),
                    Object::List(list) => {
                        SnapshotValue::List(list.iter().map(str::to_string).collect())
                    }
                    Object::ZSet(zset) => SnapshotValue::Sorted(
                        zset.iter().map(|(m, s)| (m.to_string(), s)).collect(),
                    ),
                };
                (entry.key.as_str(), value)
            }),
        )?;
        info!(
            entries = self.index.len(),
            path = %self.config.persistence_path.display(),
            "snapshot saved"
        );
        Ok(())
    }
}
