//! Entry store: the key + tagged-value record owned by an index slot.
//!
//! `Object` is the exhaustive sum of everything an entry can hold.
//! Replacing an entry's object drops the previous payload, so a SET over
//! a list releases the list wholesale.

use coral_core::Kind;

use crate::list::DList;
use crate::zset::ZSet;

/// Tagged value owned by a hash entry.
#[derive(Debug, Clone)]
pub enum Object {
    /// String payload.
    Str(String),
    /// Doubly-linked list payload.
    List(DList),
    /// Sorted-set payload.
    ZSet(ZSet),
}

impl Object {
    /// Kind tag for this payload.
    pub fn kind(&self) -> Kind {
        match self {
            Object::Str(_) => Kind::String,
            Object::List(_) => Kind::List,
            Object::ZSet(_) => Kind::SortedSet,
        }
    }

    /// Borrow the string payload.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Object::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Borrow the list payload.
    pub fn as_list(&self) -> Option<&DList> {
        match self {
            Object::List(l) => Some(l),
            _ => None,
        }
    }

    /// Mutably borrow the list payload.
    pub fn as_list_mut(&mut self) -> Option<&mut DList> {
        match self {
            Object::List(l) => Some(l),
            _ => None,
        }
    }

    /// Borrow the sorted-set payload.
    pub fn as_zset(&self) -> Option<&ZSet> {
        match self {
            Object::ZSet(z) => Some(z),
            _ => None,
        }
    }

    /// Mutably borrow the sorted-set payload.
    pub fn as_zset_mut(&mut self) -> Option<&mut ZSet> {
        match self {
            Object::ZSet(z) => Some(z),
            _ => None,
        }
    }

    /// Approximate heap footprint of the payload in bytes.
    pub fn memory_usage(&self) -> usize {
        match self {
            Object::Str(s) => s.capacity(),
            Object::List(l) => l.memory_usage(),
            Object::ZSet(z) => z.memory_usage(),
        }
    }
}

/// A keyed record in the index. Keys are unique within the index; the
/// entry owns both its key bytes and its payload.
#[derive(Debug, Clone)]
pub struct Entry {
    /// The key this entry is filed under.
    pub key: String,
    /// The payload.
    pub value: Object,
}

impl Entry {
    /// Create an entry.
    pub fn new(key: impl Into<String>, value: Object) -> Self {
        Entry {
            key: key.into(),
            value,
        }
    }

    /// Kind tag of the payload.
    pub fn kind(&self) -> Kind {
        self.value.kind()
    }

    /// Approximate heap footprint of key and payload in bytes.
    pub fn memory_usage(&self) -> usize {
        self.key.capacity() + self.value.memory_usage()
    }
}
