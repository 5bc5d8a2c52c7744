//! The storage capability behind the cache.
//!
//! A backend owns a schema-versioned table of key → record. The cache
//! talks to it through the [`Backend`] trait only, so the persistent and
//! volatile implementations are interchangeable, and construction
//! failures are data ([`OpenFailure`]) rather than exceptions — the
//! facade inspects the failure kind and picks the fallback
//! deterministically.

use crate::error::BackendError;
use std::path::PathBuf;
use trajkit_common::{FileKey, TrajInfo};
use trajkit_config::CacheConfig;

/// Current schema version written to new stores and new records.
pub const SCHEMA_VERSION: i64 = 1;

/// File name of the persistent store inside the configured directory.
pub const STORE_FILE_NAME: &str = "trajectory_info.sqlite";

/// A record as it came out of a backend, which may predate the current
/// schema.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredRecord {
    /// A record in the current shape.
    Current(TrajInfo),

    /// A schema-version-0 record, which held only a frame count stored as
    /// text. Dimensionality and offsets were not captured at that
    /// version and must be recomputed on migration.
    LegacyV0 {
        /// The frame count, as stored.
        length: String,
    },
}

/// Key → record storage with insertion-order eviction.
///
/// Implementations are either persistent (tied to one store file) or
/// volatile (process lifetime only). Absence of a key is a normal `get`
/// result, never an error.
pub trait Backend: Send + std::fmt::Debug {
    /// Looks up the record stored under `key`.
    fn get(&mut self, key: &FileKey) -> Result<Option<StoredRecord>, BackendError>;

    /// Stores `info` under its key, overwriting any existing record. The
    /// overwritten record counts as freshly inserted for eviction order.
    fn put(&mut self, info: &TrajInfo) -> Result<(), BackendError>;

    /// Number of records currently stored.
    fn count(&self) -> Result<usize, BackendError>;

    /// Bytes occupied by the store, or 0 for volatile backends, for which
    /// size-based eviction is a no-op.
    fn total_size_bytes(&self) -> Result<u64, BackendError>;

    /// Removes up to `n` records, least recently inserted first, and
    /// returns how many were removed.
    fn evict_oldest(&mut self, n: usize) -> Result<usize, BackendError>;

    /// Reclaims space freed by eviction, if the storage engine needs an
    /// explicit step for that.
    fn compact(&mut self) -> Result<(), BackendError> {
        Ok(())
    }

    /// The schema version this backend writes.
    fn schema_version(&self) -> i64;
}

/// Why a persistent backend could not be constructed.
#[derive(Debug, thiserror::Error)]
pub enum OpenFailure {
    /// The persistent store engine is not present in this build.
    #[error("persistent store driver unavailable: {dependency}")]
    DriverUnavailable {
        /// Name of the missing dependency.
        dependency: &'static str,
    },

    /// The store file exists but is corrupted. The file is left untouched
    /// on disk so it can be inspected or discarded manually.
    #[error("store file {path} is corrupted: {reason}")]
    StoreCorrupted {
        /// Path of the corrupted file.
        path: PathBuf,
        /// What the validation found.
        reason: String,
    },

    /// No store directory is configured. This is the normal volatile-only
    /// mode, not a degradation.
    #[error("no writable location configured for the store")]
    NoWritableLocation,
}

/// Opens (or creates) the persistent backend described by `config`.
///
/// Returns `NoWritableLocation` when no store directory is configured,
/// `DriverUnavailable` when the engine is compiled out, and
/// `StoreCorrupted` when an existing file fails validation. The caller
/// decides what to substitute; this function never falls back by itself.
pub fn open_or_create(config: &CacheConfig) -> Result<Box<dyn Backend>, OpenFailure> {
    let Some(dir) = &config.store_dir else {
        return Err(OpenFailure::NoWritableLocation);
    };
    open_store(&dir.join(STORE_FILE_NAME))
}

#[cfg(feature = "sqlite")]
fn open_store(path: &std::path::Path) -> Result<Box<dyn Backend>, OpenFailure> {
    crate::sqlite::SqliteBackend::open(path).map(|b| Box::new(b) as Box<dyn Backend>)
}

#[cfg(not(feature = "sqlite"))]
fn open_store(_path: &std::path::Path) -> Result<Box<dyn Backend>, OpenFailure> {
    Err(OpenFailure::DriverUnavailable {
        dependency: "rusqlite",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_store_dir_is_no_writable_location() {
        let config = CacheConfig::default();
        let err = open_or_create(&config).unwrap_err();
        assert!(matches!(err, OpenFailure::NoWritableLocation));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn store_dir_opens_persistent_backend() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig {
            store_dir: Some(dir.path().to_path_buf()),
            ..CacheConfig::default()
        };
        let backend = open_or_create(&config).unwrap();
        assert_eq!(backend.schema_version(), SCHEMA_VERSION);
        assert!(dir.path().join(STORE_FILE_NAME).exists());
    }

    #[cfg(not(feature = "sqlite"))]
    #[test]
    fn missing_driver_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let config = CacheConfig {
            store_dir: Some(dir.path().to_path_buf()),
            ..CacheConfig::default()
        };
        let err = open_or_create(&config).unwrap_err();
        assert!(matches!(
            err,
            OpenFailure::DriverUnavailable {
                dependency: "rusqlite"
            }
        ));
    }

    #[test]
    fn corrupted_display_names_path() {
        let err = OpenFailure::StoreCorrupted {
            path: PathBuf::from("/tmp/trajectory_info.sqlite"),
            reason: "not a database".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("corrupted"));
        assert!(msg.contains("trajectory_info.sqlite"));
    }

    #[test]
    fn driver_unavailable_display_names_dependency() {
        let err = OpenFailure::DriverUnavailable {
            dependency: "rusqlite",
        };
        assert!(err.to_string().contains("rusqlite"));
    }
}
