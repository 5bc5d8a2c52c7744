//! Persistent trajectory metadata caching.
//!
//! Scanning a large trajectory file for its frame count, dimensionality,
//! and per-frame offsets can take as long as reading the whole file. This
//! crate caches those scan results keyed by a fingerprint of the file's
//! identity and the reader's configuration, so each unique file is scanned
//! at most once per process fleet of runs.
//!
//! The cache is strictly an optimization layer: every failure mode of the
//! store (missing engine, corrupted file, no writable location, mid-session
//! malfunction) degrades to an in-memory backend or a fresh computation,
//! never to an error surfaced to the caller.

#![warn(missing_docs)]

pub mod backend;
pub mod error;
pub mod events;
pub mod evict;
pub mod facade;
pub mod memory;
pub mod migrate;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use backend::{open_or_create, Backend, OpenFailure, StoredRecord};
pub use error::{BackendError, LookupError};
pub use events::{CacheEvent, EventSink};
pub use facade::TrajInfoCache;
pub use memory::MemoryBackend;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteBackend;
