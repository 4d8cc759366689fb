//! Append-only record collection with canonical-key deduplication.

use std::collections::HashSet;

use placefeed_core::Record;

/// The committed records of a session plus the dedup set of their
/// canonical keys.
///
/// The list and the set are only ever updated together inside
/// [`RecordStore::commit`], so a record count and the key set can never
/// disagree. No internal locking: the engine mutates the store from a
/// single execution context, and the session serializes outside access.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<Record>,
    keys: HashSet<String>,
}

impl RecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Whether a record with this canonical key is already committed.
    #[must_use]
    pub fn contains_key(&self, canonical_key: &str) -> bool {
        self.keys.contains(canonical_key)
    }

    /// Commits a record, updating list and dedup set as one step.
    ///
    /// Returns `false` without mutating anything if the record's name is
    /// empty or its canonical key is already present.
    pub fn commit(&mut self, record: Record) -> bool {
        if record.name.trim().is_empty() {
            return false;
        }
        let key = record.canonical_key();
        if !self.keys.insert(key) {
            return false;
        }
        self.records.push(record);
        true
    }

    /// Drops all records and keys. Only meaningful between runs.
    pub fn clear(&mut self) {
        self.records.clear();
        self.keys.clear();
    }
}
