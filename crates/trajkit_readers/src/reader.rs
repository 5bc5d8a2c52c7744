//! The reader capability consumed by the metadata cache.

use crate::error::ReaderError;
use std::path::Path;
use trajkit_common::{FileKey, TrajInfo};

/// Metadata computed by scanning a trajectory file.
///
/// This is the reader's half of a [`TrajInfo`]: everything except the
/// identity key, which only the cache can derive because it folds in the
/// file's filesystem attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajMeta {
    /// Number of frames found.
    pub length: i64,

    /// Dimensionality of each frame.
    pub ndim: i32,

    /// Byte offset of each frame start; empty for uniform-size frames.
    pub offsets: Vec<i64>,
}

impl TrajMeta {
    /// Attaches an identity key, producing a full record.
    pub fn into_info(self, key: FileKey) -> TrajInfo {
        TrajInfo {
            length: self.length,
            ndim: self.ndim,
            offsets: self.offsets,
            key,
        }
    }
}

/// A reader for one trajectory file format.
///
/// Implementations must satisfy this interface explicitly; the cache
/// consumes nothing else from a reader. `scan` is the expensive operation
/// the cache memoizes, and `discriminator` feeds the cache key so that two
/// differently parameterized readers over the same file never share a
/// record.
pub trait TrajReader {
    /// Scans the file and computes its structural metadata.
    ///
    /// An inaccessible or empty input fails with
    /// [`ReaderError::InvalidInput`].
    fn scan(&self, path: &Path) -> Result<TrajMeta, ReaderError>;

    /// Stable identity of this reader's format and parameterization.
    fn discriminator(&self) -> String;

    /// Whether this reader consumes file-backed data. Non-file-backed
    /// sources bypass the cache entirely.
    fn file_backed(&self) -> bool {
        true
    }
}
