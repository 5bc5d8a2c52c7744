//! Structural metadata records for trajectory files.

use crate::key::FileKey;
use serde::{Deserialize, Serialize};

/// Cached structural metadata for a single trajectory file.
///
/// Records what a full scan of the file discovered: the number of frames,
/// their dimensionality, and (for formats without uniform-size frames) the
/// byte offset of each frame start. Immutable once constructed; a file
/// changed on disk gets a new key and a new record rather than an update
/// in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajInfo {
    /// Number of frames in the file.
    pub length: i64,

    /// Dimensionality of each frame.
    pub ndim: i32,

    /// Byte offset of each frame start. Empty for formats whose frames are
    /// uniform in size and can be seeked by arithmetic alone.
    pub offsets: Vec<i64>,

    /// The fingerprint this record is stored under.
    pub key: FileKey,
}

impl TrajInfo {
    /// Returns `true` if the file needs a per-frame offset table to seek.
    pub fn has_offset_table(&self) -> bool {
        !self.offsets.is_empty()
    }
}
