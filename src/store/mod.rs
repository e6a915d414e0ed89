//! The in-memory record store — a recency-ordered identity→record map.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::{Identity, Record};

/// Ordered mapping from document identity to its persisted [`Record`].
///
/// Map order encodes recency: every write moves the entry to the
/// most-recently-used end, and eviction pops from the front. Recency is
/// by write time only — reads do not reorder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordStore {
    records: IndexMap<Identity, Record>,
}

impl RecordStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record without touching recency.
    pub fn get(&self, identity: &Identity) -> Option<&Record> {
        self.records.get(identity)
    }

    /// Mutable access to the record for `identity`, created empty if the
    /// identity is new. Does not touch recency; call [`Self::touch`] once
    /// the write turns out to be a real change.
    pub fn record_mut(&mut self, identity: &Identity) -> &mut Record {
        self.records.entry(identity.clone()).or_default()
    }

    /// Insert or replace a record and move it to the most-recent end.
    pub fn insert(&mut self, identity: Identity, record: Record) {
        self.records.insert(identity.clone(), record);
        self.touch(&identity);
    }

    /// Move an entry to the most-recently-written end.
    pub fn touch(&mut self, identity: &Identity) {
        if let Some(index) = self.records.get_index_of(identity) {
            let last = self.records.len() - 1;
            self.records.move_index(index, last);
        }
    }

    /// Evict oldest entries until at most `max_records` remain. Returns the
    /// number of evicted records.
    pub fn evict_to(&mut self, max_records: usize) -> usize {
        let mut evicted = 0;
        while self.records.len() > max_records {
            self.records.shift_remove_index(0);
            evicted += 1;
        }
        evicted
    }

    /// Identities in recency order, oldest first.
    pub fn identities(&self) -> impl Iterator<Item = &Identity> {
        self.records.keys()
    }
}
