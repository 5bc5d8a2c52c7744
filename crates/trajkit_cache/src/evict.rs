//! Enforcement of the configured store bounds.
//!
//! Runs after every successful write. The entry-count bound is exact; the
//! size bound is approximate and enforced at whole-record granularity by
//! removing small batches of the oldest records and re-checking, so the
//! store may transiently exceed it between writes but is brought back
//! under promptly.

use crate::backend::Backend;
use crate::error::BackendError;
use trajkit_config::CacheConfig;

/// How many records a size-driven pass removes before re-checking.
const SIZE_EVICTION_BATCH: usize = 8;

/// Brings the backend back under the configured bounds.
///
/// The record written just before this call is the newest and therefore
/// survives both passes, with one exception: `max_entries == 0` (cache
/// disabled) empties the store entirely. The size pass stops once a
/// single record remains, since granularity finer than whole records is
/// not attempted.
pub fn enforce(backend: &mut dyn Backend, config: &CacheConfig) -> Result<(), BackendError> {
    let count = backend.count()?;
    if count > config.max_entries {
        backend.evict_oldest(count - config.max_entries)?;
    }

    let max_bytes = config.max_size_bytes();
    loop {
        if backend.total_size_bytes()? <= max_bytes {
            break;
        }
        let count = backend.count()?;
        if count <= 1 {
            break;
        }
        let batch = SIZE_EVICTION_BATCH.min(count - 1);
        if backend.evict_oldest(batch)? == 0 {
            break;
        }
        backend.compact()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{StoredRecord, SCHEMA_VERSION};
    use crate::memory::MemoryBackend;
    use std::path::Path;
    use std::time::UNIX_EPOCH;
    use trajkit_common::{FileKey, TrajInfo};

    fn key(n: u64) -> FileKey {
        FileKey::derive(Path::new("/data/run.trj"), n, UNIX_EPOCH, "test")
    }

    fn info(n: u64) -> TrajInfo {
        TrajInfo {
            length: n as i64,
            ndim: 3,
            offsets: vec![],
            key: key(n),
        }
    }

    fn config(max_entries: usize) -> CacheConfig {
        CacheConfig {
            max_entries,
            ..CacheConfig::default()
        }
    }

    #[test]
    fn under_bound_is_untouched() {
        let mut backend = MemoryBackend::new();
        for n in 1..=3 {
            backend.put(&info(n)).unwrap();
        }
        enforce(&mut backend, &config(10)).unwrap();
        assert_eq!(backend.count().unwrap(), 3);
    }

    #[test]
    fn excess_entries_are_evicted_oldest_first() {
        let mut backend = MemoryBackend::new();
        for n in 1..=5 {
            backend.put(&info(n)).unwrap();
        }
        enforce(&mut backend, &config(2)).unwrap();

        assert_eq!(backend.count().unwrap(), 2);
        assert!(backend.get(&key(4)).unwrap().is_some());
        assert!(backend.get(&key(5)).unwrap().is_some());
    }

    #[test]
    fn zero_max_entries_empties_the_store() {
        let mut backend = MemoryBackend::new();
        backend.put(&info(1)).unwrap();
        enforce(&mut backend, &config(0)).unwrap();
        assert_eq!(backend.count().unwrap(), 0);
    }

    #[test]
    fn volatile_backend_skips_size_pass() {
        // MemoryBackend reports size 0, so even a tiny budget changes nothing.
        let mut backend = MemoryBackend::new();
        for n in 1..=3 {
            backend.put(&info(n)).unwrap();
        }
        let config = CacheConfig {
            max_size_kb: 1,
            ..CacheConfig::default()
        };
        enforce(&mut backend, &config).unwrap();
        assert_eq!(backend.count().unwrap(), 3);
    }

    /// Backend whose reported size is proportional to its record count,
    /// for exercising the size pass without a real store file.
    #[derive(Debug)]
    struct SizedBackend {
        inner: MemoryBackend,
        bytes_per_record: u64,
    }

    impl Backend for SizedBackend {
        fn get(&mut self, key: &FileKey) -> Result<Option<StoredRecord>, BackendError> {
            self.inner.get(key)
        }
        fn put(&mut self, info: &TrajInfo) -> Result<(), BackendError> {
            self.inner.put(info)
        }
        fn count(&self) -> Result<usize, BackendError> {
            self.inner.count()
        }
        fn total_size_bytes(&self) -> Result<u64, BackendError> {
            Ok(self.inner.count()? as u64 * self.bytes_per_record)
        }
        fn evict_oldest(&mut self, n: usize) -> Result<usize, BackendError> {
            self.inner.evict_oldest(n)
        }
        fn schema_version(&self) -> i64 {
            SCHEMA_VERSION
        }
    }

    #[test]
    fn size_pass_evicts_until_under_budget() {
        let mut backend = SizedBackend {
            inner: MemoryBackend::new(),
            bytes_per_record: 1024,
        };
        for n in 1..=100 {
            backend.put(&info(n)).unwrap();
        }
        // Budget of 10 KiB: room for 10 records of 1 KiB.
        let config = CacheConfig {
            max_size_kb: 10,
            ..CacheConfig::default()
        };
        enforce(&mut backend, &config).unwrap();

        let count = backend.count().unwrap();
        assert!(count <= 10, "still over budget: {count} records");
        assert!(count > 0);
        // The newest record always survives.
        assert!(backend.get(&key(100)).unwrap().is_some());
    }

    #[test]
    fn single_oversized_record_survives() {
        let mut backend = SizedBackend {
            inner: MemoryBackend::new(),
            bytes_per_record: 64 * 1024,
        };
        backend.put(&info(1)).unwrap();
        let config = CacheConfig {
            max_size_kb: 1,
            ..CacheConfig::default()
        };
        enforce(&mut backend, &config).unwrap();
        assert_eq!(backend.count().unwrap(), 1);
    }
}
