//! The process-wide cache facade.
//!
//! [`TrajInfoCache`] ties the key derivation, backend, migration, and
//! eviction together behind a single lookup entry point. One instance per
//! process is the normal mode ([`TrajInfoCache::instance`]); tests build
//! standalone instances and inject or swap backends directly.
//!
//! All store access is serialized under one lock. Lookups are rare and
//! cheap next to the file scans they avoid, so finer-grained locking
//! would buy nothing.

use crate::backend::{self, Backend, OpenFailure};
use crate::error::LookupError;
use crate::events::{CacheEvent, EventSink};
use crate::evict;
use crate::memory::MemoryBackend;
use crate::migrate;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};
use trajkit_common::{FileKey, TrajInfo};
use trajkit_config::CacheConfig;
use trajkit_readers::{ReaderError, TrajReader};

static INSTANCE: OnceLock<TrajInfoCache> = OnceLock::new();

/// Cache of structural metadata for trajectory files.
///
/// A lookup answers from the store when it can and otherwise runs the
/// reader's scan, records the result, and enforces the configured bounds.
/// Store trouble of any kind degrades to a volatile backend; it never
/// stops a lookup from returning a correct result.
pub struct TrajInfoCache {
    config: CacheConfig,
    backend: Mutex<Option<Box<dyn Backend>>>,
    sink: EventSink,
}

impl TrajInfoCache {
    /// Returns the process-wide instance, created with the default
    /// configuration (volatile-only) on first call.
    pub fn instance() -> &'static TrajInfoCache {
        INSTANCE.get_or_init(|| TrajInfoCache::new(CacheConfig::default()))
    }

    /// Creates a cache with the given configuration. The backend is
    /// constructed lazily on first use.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            backend: Mutex::new(None),
            sink: EventSink::new(),
        }
    }

    /// Creates a cache over a pre-built backend, bypassing backend
    /// construction from the configuration.
    pub fn with_backend(config: CacheConfig, backend: Box<dyn Backend>) -> Self {
        Self {
            config,
            backend: Mutex::new(Some(backend)),
            sink: EventSink::new(),
        }
    }

    /// Replaces the backend, returning the previous one so the caller can
    /// restore it later. The returned backend carries the only remaining
    /// handle to its resources.
    pub fn swap_backend(&self, new: Box<dyn Backend>) -> Option<Box<dyn Backend>> {
        let mut guard = self.backend.lock().unwrap();
        guard.replace(new)
    }

    /// Releases the backend and its resources. The cache stays usable: a
    /// later lookup reconstructs the backend from the configuration, and
    /// a reopened store file yields exactly the records written before
    /// the close.
    pub fn close(&self) {
        let mut guard = self.backend.lock().unwrap();
        *guard = None;
    }

    /// Looks up the structural metadata for `path` as read by `reader`,
    /// scanning the file only when no usable record exists.
    ///
    /// Non-file-backed sources are answered from the reader directly and
    /// never create a record. Reader failures propagate unchanged;
    /// backend failures are absorbed by swapping in a volatile backend
    /// and redoing the lookup within the same call.
    pub fn info(&self, path: &Path, reader: &dyn TrajReader) -> Result<TrajInfo, ReaderError> {
        if !reader.file_backed() {
            // In-memory sources must never grow the cache.
            let meta = reader.scan(path)?;
            let key = FileKey::derive(path, 0, UNIX_EPOCH, &reader.discriminator());
            return Ok(meta.into_info(key));
        }

        let (size, mtime) = stat(path)?;
        let key = FileKey::derive(path, size, mtime, &reader.discriminator());

        if !self.config.enabled {
            let meta = reader.scan(path)?;
            return Ok(meta.into_info(key));
        }

        let mut guard = self.backend.lock().unwrap();
        match Self::try_lookup(&mut guard, &self.config, &self.sink, path, reader, key) {
            Ok(info) => Ok(info),
            Err(LookupError::Reader(e)) => Err(e),
            Err(LookupError::Backend(e)) => {
                // The backend misbehaved mid-session: swap it out and redo
                // the lookup on a volatile store, atomically under the
                // same lock.
                self.sink.emit(CacheEvent::BackendFailure {
                    reason: e.to_string(),
                });
                *guard = Some(Box::new(MemoryBackend::new()));
                match Self::try_lookup(&mut guard, &self.config, &self.sink, path, reader, key) {
                    Ok(info) => Ok(info),
                    Err(LookupError::Reader(e)) => Err(e),
                    Err(LookupError::Backend(_)) => {
                        // Volatile operations cannot fail, but if they
                        // somehow did, compute without caching.
                        let meta = reader.scan(path)?;
                        Ok(meta.into_info(key))
                    }
                }
            }
        }
    }

    /// Number of records currently stored. Zero when the cache is
    /// disabled.
    pub fn num_entries(&self) -> usize {
        if !self.config.enabled {
            return 0;
        }
        let mut guard = self.backend.lock().unwrap();
        let backend = Self::ensure_backend(&mut guard, &self.config, &self.sink);
        backend.count().unwrap_or(0)
    }

    /// Schema version the active backend writes.
    pub fn schema_version(&self) -> i64 {
        let mut guard = self.backend.lock().unwrap();
        Self::ensure_backend(&mut guard, &self.config, &self.sink).schema_version()
    }

    /// Path of the persistent store file, if one is configured.
    pub fn store_file(&self) -> Option<PathBuf> {
        self.config
            .store_dir
            .as_ref()
            .map(|dir| dir.join(backend::STORE_FILE_NAME))
    }

    /// Snapshot of the degradation events recorded so far.
    pub fn events(&self) -> Vec<CacheEvent> {
        self.sink.events()
    }

    fn try_lookup(
        slot: &mut Option<Box<dyn Backend>>,
        config: &CacheConfig,
        sink: &EventSink,
        path: &Path,
        reader: &dyn TrajReader,
        key: FileKey,
    ) -> Result<TrajInfo, LookupError> {
        let backend = Self::ensure_backend(slot, config, sink);
        if let Some(stored) = backend.get(&key).map_err(LookupError::Backend)? {
            return migrate::resolve(stored, path, reader, key, backend);
        }

        let meta = reader.scan(path).map_err(LookupError::Reader)?;
        let info = meta.into_info(key);
        backend.put(&info).map_err(LookupError::Backend)?;
        evict::enforce(backend, config).map_err(LookupError::Backend)?;
        Ok(info)
    }

    fn ensure_backend<'a>(
        slot: &'a mut Option<Box<dyn Backend>>,
        config: &CacheConfig,
        sink: &EventSink,
    ) -> &'a mut dyn Backend {
        slot.get_or_insert_with(|| Self::build_backend(config, sink))
            .as_mut()
    }

    fn build_backend(config: &CacheConfig, sink: &EventSink) -> Box<dyn Backend> {
        match backend::open_or_create(config) {
            Ok(backend) => backend,
            Err(failure) => Self::fallback_backend(failure, sink),
        }
    }

    /// Maps a construction failure to the volatile fallback, recording
    /// one event for the failure kinds a user should hear about.
    fn fallback_backend(failure: OpenFailure, sink: &EventSink) -> Box<dyn Backend> {
        match failure {
            // The expected mode when no directory is configured, not a
            // degradation: no event.
            OpenFailure::NoWritableLocation => {}
            OpenFailure::StoreCorrupted { path, reason } => {
                sink.emit(CacheEvent::StoreCorrupted { path, reason });
            }
            OpenFailure::DriverUnavailable { dependency } => {
                sink.emit(CacheEvent::DriverUnavailable {
                    dependency: dependency.to_string(),
                });
            }
        }
        Box::new(MemoryBackend::new())
    }
}

fn stat(path: &Path) -> Result<(u64, SystemTime), ReaderError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| ReaderError::invalid_input(path, e.to_string()))?;
    let mtime = metadata
        .modified()
        .map_err(|e| ReaderError::invalid_input(path, e.to_string()))?;
    Ok((metadata.len(), mtime))
}
