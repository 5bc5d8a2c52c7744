//! SQLite-backed persistent store.
//!
//! One store file per backend. Records live in a `traj_info` table keyed
//! by the hex form of the fingerprint, with a monotonic row id providing
//! insertion order for eviction. A `meta` table carries the store-level
//! schema version, validated at open time: a file that cannot answer the
//! validation query is reported as corrupted and left untouched on disk.

use crate::backend::{Backend, OpenFailure, StoredRecord, SCHEMA_VERSION};
use crate::error::BackendError;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use trajkit_common::{FileKey, TrajInfo};

impl From<rusqlite::Error> for BackendError {
    fn from(e: rusqlite::Error) -> Self {
        BackendError::new(e.to_string())
    }
}

/// Persistent backend over a single SQLite store file.
pub struct SqliteBackend {
    conn: Connection,
    path: PathBuf,
}

impl std::fmt::Debug for SqliteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteBackend")
            .field("path", &self.path)
            .finish()
    }
}

impl SqliteBackend {
    /// Opens the store file at `path`, creating it (and its parent
    /// directory) if absent.
    ///
    /// An existing file must pass schema validation before any write is
    /// attempted; a file that fails it yields
    /// [`OpenFailure::StoreCorrupted`] with the file left exactly as it
    /// was found.
    pub fn open(path: &Path) -> Result<Self, OpenFailure> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|_| OpenFailure::NoWritableLocation)?;
            }
        }

        let preexisting = std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);
        let conn = Connection::open(path).map_err(|e| {
            if preexisting {
                Self::corrupted(path, e.to_string())
            } else {
                OpenFailure::NoWritableLocation
            }
        })?;

        if preexisting {
            Self::validate(&conn, path)?;
        }
        Self::init_schema(&conn).map_err(|e| Self::corrupted(path, e.to_string()))?;

        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// The store file this backend is tied to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn corrupted(path: &Path, reason: String) -> OpenFailure {
        OpenFailure::StoreCorrupted {
            path: path.to_path_buf(),
            reason,
        }
    }

    /// Checks that an existing file is one of ours at a supported schema
    /// version. Read-only: a failing file must come out byte-identical.
    fn validate(conn: &Connection, path: &Path) -> Result<(), OpenFailure> {
        let raw: String = conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .map_err(|e| Self::corrupted(path, e.to_string()))?;
        let version: i64 = raw.parse().map_err(|_| {
            Self::corrupted(path, format!("unparsable schema version '{raw}'"))
        })?;
        if version > SCHEMA_VERSION {
            return Err(Self::corrupted(
                path,
                format!("schema version {version} is newer than supported {SCHEMA_VERSION}"),
            ));
        }
        Ok(())
    }

    fn init_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
        conn.pragma_update(None, "journal_mode", "TRUNCATE")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS meta (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS traj_info (
                id      INTEGER PRIMARY KEY AUTOINCREMENT,
                key     TEXT NOT NULL UNIQUE,
                version INTEGER NOT NULL,
                length,             -- no affinity: version-0 rows store text here
                ndim    INTEGER,
                offsets BLOB
            );",
        )?;
        conn.execute(
            "INSERT OR IGNORE INTO meta (key, value) VALUES ('schema_version', ?1)",
            params![SCHEMA_VERSION.to_string()],
        )?;
        Ok(())
    }
}

impl Backend for SqliteBackend {
    fn get(&mut self, key: &FileKey) -> Result<Option<StoredRecord>, BackendError> {
        let owned_key = *key;
        let row: Option<Option<StoredRecord>> = self
            .conn
            .query_row(
                "SELECT version, length, ndim, offsets FROM traj_info WHERE key = ?1",
                params![key.to_string()],
                |row| {
                    let version: i64 = row.get(0)?;
                    match version {
                        0 => {
                            let length: String = row.get(1)?;
                            Ok(Some(StoredRecord::LegacyV0 { length }))
                        }
                        SCHEMA_VERSION => {
                            let length: i64 = row.get(1)?;
                            let ndim: i64 = row.get(2)?;
                            let blob: Vec<u8> = row.get(3)?;
                            let offsets: Vec<i64> = bincode::serde::decode_from_slice(
                                &blob,
                                bincode::config::standard(),
                            )
                            .map_err(|e| {
                                rusqlite::Error::FromSqlConversionFailure(
                                    3,
                                    rusqlite::types::Type::Blob,
                                    Box::new(e),
                                )
                            })?
                            .0;
                            Ok(Some(StoredRecord::Current(TrajInfo {
                                length,
                                ndim: ndim as i32,
                                offsets,
                                key: owned_key,
                            })))
                        }
                        // A row written by a newer trajkit: treat as a miss
                        // so it is recomputed and overwritten in our shape.
                        _ => Ok(None),
                    }
                },
            )
            .optional()?;
        Ok(row.flatten())
    }

    fn put(&mut self, info: &TrajInfo) -> Result<(), BackendError> {
        let blob = bincode::serde::encode_to_vec(&info.offsets, bincode::config::standard())
            .map_err(|e| BackendError::new(format!("failed to encode offsets: {e}")))?;
        self.conn.execute(
            "INSERT OR REPLACE INTO traj_info (key, version, length, ndim, offsets)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![info.key.to_string(), SCHEMA_VERSION, info.length, info.ndim, blob],
        )?;
        Ok(())
    }

    fn count(&self) -> Result<usize, BackendError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM traj_info", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    fn total_size_bytes(&self) -> Result<u64, BackendError> {
        let page_count: i64 = self
            .conn
            .pragma_query_value(None, "page_count", |row| row.get(0))?;
        let page_size: i64 = self
            .conn
            .pragma_query_value(None, "page_size", |row| row.get(0))?;
        Ok((page_count * page_size) as u64)
    }

    fn evict_oldest(&mut self, n: usize) -> Result<usize, BackendError> {
        let removed = self.conn.execute(
            "DELETE FROM traj_info WHERE id IN
             (SELECT id FROM traj_info ORDER BY id LIMIT ?1)",
            params![n as i64],
        )?;
        Ok(removed)
    }

    fn compact(&mut self) -> Result<(), BackendError> {
        self.conn.execute_batch("VACUUM")?;
        Ok(())
    }

    fn schema_version(&self) -> i64 {
        SCHEMA_VERSION
    }
}
