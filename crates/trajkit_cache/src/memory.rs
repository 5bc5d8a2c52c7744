//! Volatile in-memory backend.

use crate::backend::{Backend, StoredRecord, SCHEMA_VERSION};
use crate::error::BackendError;
use std::collections::{HashMap, VecDeque};
use trajkit_common::{FileKey, TrajInfo};

/// Process-lifetime backend used when no persistent store is available:
/// no directory configured, engine missing, or the on-disk store failed
/// validation or misbehaved mid-session.
///
/// Insertion order is tracked in a queue so `evict_oldest` removes the
/// least recently inserted records first; re-inserting a key moves it to
/// the back. Arbitrary removal would break that bookkeeping, so the only
/// way out of the map is eviction.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    records: HashMap<FileKey, StoredRecord>,
    order: VecDeque<FileKey>,
}

impl MemoryBackend {
    /// Creates a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a raw version-0 row, as written by stores predating the
    /// structured record shape.
    pub fn insert_legacy_v0(&mut self, key: FileKey, length: impl Into<String>) {
        self.insert(
            key,
            StoredRecord::LegacyV0 {
                length: length.into(),
            },
        );
    }

    fn insert(&mut self, key: FileKey, record: StoredRecord) {
        if self.records.insert(key, record).is_some() {
            self.order.retain(|k| k != &key);
        }
        self.order.push_back(key);
    }
}

impl Backend for MemoryBackend {
    fn get(&mut self, key: &FileKey) -> Result<Option<StoredRecord>, BackendError> {
        Ok(self.records.get(key).cloned())
    }

    fn put(&mut self, info: &TrajInfo) -> Result<(), BackendError> {
        self.insert(info.key, StoredRecord::Current(info.clone()));
        Ok(())
    }

    fn count(&self) -> Result<usize, BackendError> {
        Ok(self.records.len())
    }

    fn total_size_bytes(&self) -> Result<u64, BackendError> {
        Ok(0)
    }

    fn evict_oldest(&mut self, n: usize) -> Result<usize, BackendError> {
        let mut removed = 0;
        for _ in 0..n {
            let Some(key) = self.order.pop_front() else {
                break;
            };
            self.records.remove(&key);
            removed += 1;
        }
        Ok(removed)
    }

    fn schema_version(&self) -> i64 {
        SCHEMA_VERSION
    }
}
