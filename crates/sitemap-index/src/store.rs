//! Entry storage keyed by entity identifier.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::entity::EntityId;
use crate::node::{IndexEntry, Node};

#[derive(Debug)]
struct StoredEntry {
    entry: IndexEntry,
    /// Insertion sequence number, used as a tiebreak when timestamps match.
    seq: u64,
}

/// Index entries keyed by entity identifier.
///
/// Iteration order of the backing map is irrelevant: [`EntryStore::snapshot`]
/// orders entries by timestamp, then by insertion sequence.
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: HashMap<EntityId, StoredEntry>,
    next_seq: u64,
}

impl EntryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `entry` under `id`, replacing any previous entry.
    ///
    /// A replacement counts as a new insertion for tie-breaking.
    pub fn upsert(&mut self, id: EntityId, entry: IndexEntry) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert(id, StoredEntry { entry, seq });
    }

    /// Remove the entry for `id`. Returns whether an entry was present.
    pub fn remove(&mut self, id: &EntityId) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Nodes ordered most-recently-modified first.
    ///
    /// Entries with equal timestamps keep insertion order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<&Node> {
        let mut stored: Vec<&StoredEntry> = self.entries.values().collect();
        stored.sort_by(|&a, &b| by_recency(a, b));
        stored.into_iter().map(|s| s.entry.node()).collect()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn get(&self, id: &EntityId) -> Option<&IndexEntry> {
        self.entries.get(id).map(|s| &s.entry)
    }

    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.entries.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn by_recency(a: &StoredEntry, b: &StoredEntry) -> Ordering {
    b.entry
        .sort_key()
        .cmp(&a.entry.sort_key())
        .then(a.seq.cmp(&b.seq))
}
