//! Two-table open-chained hash index with progressive rehash.
//!
//! `main` (T0) always exists; `rehash` (T1) exists only while a resize is
//! in progress. The invariants:
//!
//! - at most one rehash is in progress at a time
//! - while rehashing, every key lives in exactly one of the two tables:
//!   reads probe T1 then T0, inserts go to T1, deletes probe both
//! - table sizes are powers of two, never below [`INITIAL_TABLE_SIZE`]
//!
//! Resizing is driven entirely by [`HashIndex::maintenance`]: one tick
//! either runs the load check (when idle) or migrates the single chain at
//! the rehash cursor. The index never ticks itself; the engine worker
//! ticks before each request and the snapshot loader ticks between
//! inserts.

use tracing::debug;

use crate::entry::Entry;
use crate::hash::murmur2;

/// Smallest (and initial) table size.
pub const INITIAL_TABLE_SIZE: usize = 16;
/// Grow when the entry count exceeds this fraction of the main table.
pub const LOAD_FACTOR_EXPAND: f64 = 0.7;
/// Shrink when the entry count drops below this fraction of the main table.
pub const LOAD_FACTOR_SHRINK: f64 = 0.1;

#[derive(Debug)]
struct Node {
    entry: Entry,
    next: Option<Box<Node>>,
}

#[derive(Debug)]
struct Table {
    slots: Vec<Option<Box<Node>>>,
    count: usize,
}

impl Table {
    fn new(size: usize) -> Self {
        let mut slots = Vec::with_capacity(size);
        slots.resize_with(size, || None);
        Table { slots, count: 0 }
    }

    fn size(&self) -> usize {
        self.slots.len()
    }

    fn find(&self, idx: usize, key: &str) -> Option<&Entry> {
        let mut cur = self.slots[idx].as_deref();
        while let Some(node) = cur {
            if node.entry.key == key {
                return Some(&node.entry);
            }
            cur = node.next.as_deref();
        }
        None
    }

    fn find_mut(&mut self, idx: usize, key: &str) -> Option<&mut Entry> {
        let mut cur = self.slots[idx].as_deref_mut();
        while let Some(node) = cur {
            if node.entry.key == key {
                return Some(&mut node.entry);
            }
            cur = node.next.as_deref_mut();
        }
        None
    }

    fn push(&mut self, idx: usize, entry: Entry) {
        let next = self.slots[idx].take();
        self.slots[idx] = Some(Box::new(Node { entry, next }));
        self.count += 1;
    }

    fn unlink(&mut self, idx: usize, key: &str) -> Option<Entry> {
        let mut removed = None;
        let mut kept: Option<Box<Node>> = None;
        let mut chain = self.slots[idx].take();
        while let Some(mut node) = chain {
            chain = node.next.take();
            if removed.is_none() && node.entry.key == key {
                removed = Some(node.entry);
            } else {
                node.next = kept;
                kept = Some(node);
            }
        }
        self.slots[idx] = kept;
        if removed.is_some() {
            self.count -= 1;
        }
        removed
    }
}

/// In-flight resize: the target table plus the migration cursor into the
/// old table. The cursor walks from the last slot down to zero.
#[derive(Debug)]
struct Rehash {
    target: Table,
    cursor: usize,
}

/// Incrementally resized hash index over [`Entry`] records.
#[derive(Debug)]
pub struct HashIndex {
    seed: u32,
    main: Table,
    rehash: Option<Rehash>,
}

impl HashIndex {
    /// Create an empty index hashing with `seed`.
    pub fn with_seed(seed: u32) -> Self {
        HashIndex {
            seed,
            main: Table::new(INITIAL_TABLE_SIZE),
            rehash: None,
        }
    }

    /// Total number of live entries across both tables.
    pub fn len(&self) -> usize {
        self.main.count + self.rehash.as_ref().map_or(0, |r| r.target.count)
    }

    /// True when no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True while a resize is in progress.
    pub fn is_rehashing(&self) -> bool {
        self.rehash.is_some()
    }

    /// Size of the main table (slots, not entries).
    pub fn table_size(&self) -> usize {
        self.main.size()
    }

    fn slot_of(&self, key: &str, size: usize) -> usize {
        murmur2(key.as_bytes(), self.seed) as usize % size
    }

    /// Look up an entry. Probes the rehash table first, then the main
    /// table.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        if let Some(rehash) = &self.rehash {
            let idx = self.slot_of(key, rehash.target.size());
            if let Some(entry) = rehash.target.find(idx, key) {
                return Some(entry);
            }
        }
        let idx = self.slot_of(key, self.main.size());
        self.main.find(idx, key)
    }

    /// Mutable lookup, same probe order as [`HashIndex::get`].
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Entry> {
        let seed = self.seed;
        let main_size = self.main.size();
        if let Some(rehash) = &mut self.rehash {
            let idx = murmur2(key.as_bytes(), seed) as usize % rehash.target.size();
            if rehash.target.find(idx, key).is_some() {
                return rehash.target.find_mut(idx, key);
            }
        }
        let idx = murmur2(key.as_bytes(), seed) as usize % main_size;
        self.main.find_mut(idx, key)
    }

    /// Take ownership of an entry and file it under its key.
    ///
    /// While rehashing, new entries always land in the target table. The
    /// caller guarantees the key is not already present; the engine
    /// always removes or mutates in place before inserting.
    pub fn insert(&mut self, entry: Entry) {
        let seed = self.seed;
        match &mut self.rehash {
            Some(rehash) => {
                let idx = murmur2(entry.key.as_bytes(), seed) as usize % rehash.target.size();
                rehash.target.push(idx, entry);
            }
            None => {
                let idx = self.slot_of(&entry.key, self.main.size());
                self.main.push(idx, entry);
            }
        }
    }

    /// Detach an entry by key and return ownership to the caller.
    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        let seed = self.seed;
        if let Some(rehash) = &mut self.rehash {
            let idx = murmur2(key.as_bytes(), seed) as usize % rehash.target.size();
            if let Some(entry) = rehash.target.unlink(idx, key) {
                return Some(entry);
            }
        }
        let idx = self.slot_of(key, self.main.size());
        self.main.unlink(idx, key)
    }

    /// One maintenance tick: run the load check when idle, otherwise
    /// migrate the single chain at the rehash cursor.
    pub fn maintenance(&mut self) {
        match self.rehash {
            None => self.check_load(),
            Some(_) => self.rehash_step(),
        }
    }

    fn check_load(&mut self) {
        let n = self.len() as f64;
        let m = self.main.size();
        if n > LOAD_FACTOR_EXPAND * m as f64 {
            self.begin_rehash(m * 2);
        } else if m > INITIAL_TABLE_SIZE && n < LOAD_FACTOR_SHRINK * m as f64 {
            self.begin_rehash(m / 2);
        }
    }

    fn begin_rehash(&mut self, size: usize) {
        debug!(from = self.main.size(), to = size, "rehash started");
        self.rehash = Some(Rehash {
            target: Table::new(size),
            cursor: self.main.size() - 1,
        });
    }

    fn rehash_step(&mut self) {
        let seed = self.seed;
        let finished = {
            let Some(rehash) = &mut self.rehash else {
                return;
            };
            let cursor = rehash.cursor;
            let mut chain = self.main.slots[cursor].take();
            while let Some(mut node) = chain {
                chain = node.next.take();
                let idx =
                    murmur2(node.entry.key.as_bytes(), seed) as usize % rehash.target.size();
                node.next = rehash.target.slots[idx].take();
                rehash.target.slots[idx] = Some(node);
                rehash.target.count += 1;
                self.main.count -= 1;
            }
            if cursor == 0 {
                true
            } else {
                rehash.cursor = cursor - 1;
                false
            }
        };
        if finished {
            if let Some(rehash) = self.rehash.take() {
                self.main = rehash.target;
                debug!(size = self.main.size(), "rehash finished");
            }
        }
    }

    /// Drop every entry and return to the initial table size.
    pub fn reset(&mut self) {
        self.main = Table::new(INITIAL_TABLE_SIZE);
        self.rehash = None;
    }

    /// Lazily iterate all live entries. During a rehash the target table
    /// is visited first, mirroring the read probe order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            tables: [self.rehash.as_ref().map(|r| &r.target), Some(&self.main)],
            table: 0,
            slot: 0,
            node: None,
        }
    }

    /// Approximate heap footprint of the index and everything it owns.
    pub fn memory_usage(&self) -> usize {
        let mut total = std::mem::size_of::<Self>();
        let tables = [
            Some(&self.main),
            self.rehash.as_ref().map(|r| &r.target),
        ];
        for table in tables.into_iter().flatten() {
            total += table.slots.capacity() * std::mem::size_of::<Option<Box<Node>>>();
            for slot in &table.slots {
                let mut cur = slot.as_deref();
                while let Some(node) = cur {
                    total += std::mem::size_of::<Node>() + node.entry.memory_usage();
                    cur = node.next.as_deref();
                }
            }
        }
        total
    }
}

/// Lazy iterator over `(kind, key)` carriers — the live entries of both
/// tables.
pub struct Iter<'a> {
    tables: [Option<&'a Table>; 2],
    table: usize,
    slot: usize,
    node: Option<&'a Node>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<&'a Entry> {
        loop {
            if let Some(node) = self.node {
                self.node = node.next.as_deref();
                return Some(&node.entry);
            }
            let table = loop {
                match self.tables.get(self.table) {
                    Some(Some(t)) => break t,
                    Some(None) => {
                        self.table += 1;
                        self.slot = 0;
                    }
                    None => return None,
                }
            };
            if self.slot < table.slots.len() {
                self.node = table.slots[self.slot].as_deref();
                self.slot += 1;
            } else {
                self.table += 1;
                self.slot = 0;
            }
        }
    }
}
