//! Transparent upgrade of legacy records on read.
//!
//! Version-0 stores captured only a frame count, stored as text. When a
//! lookup surfaces such a record the reader is re-invoked to recover the
//! dimensionality and offsets the legacy shape never held, and the
//! upgraded record is written back so the next lookup skips all of this.
//! Callers never observe a schema version.

use crate::backend::{Backend, StoredRecord};
use crate::error::LookupError;
use std::path::Path;
use trajkit_common::{FileKey, TrajInfo};
use trajkit_readers::TrajReader;

/// Turns a stored record into a current-shape [`TrajInfo`], upgrading and
/// rewriting it if it was written under an earlier schema.
///
/// The stored frame count is authoritative for a legacy record; only the
/// fields the legacy shape lacked are recomputed. A count that does not
/// parse falls back to the freshly scanned one.
pub fn resolve(
    stored: StoredRecord,
    path: &Path,
    reader: &dyn TrajReader,
    key: FileKey,
    backend: &mut dyn Backend,
) -> Result<TrajInfo, LookupError> {
    match stored {
        StoredRecord::Current(info) => Ok(info),
        StoredRecord::LegacyV0 { length } => {
            let meta = reader.scan(path).map_err(LookupError::Reader)?;
            let length = length.trim().parse::<i64>().unwrap_or(meta.length);
            let info = TrajInfo {
                length,
                ndim: meta.ndim,
                offsets: meta.offsets,
                key,
            };
            backend.put(&info).map_err(LookupError::Backend)?;
            Ok(info)
        }
    }
}
