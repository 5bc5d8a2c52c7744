//! Identity fingerprints for trajectory files.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A 256-bit fingerprint identifying a (file, reader-configuration) pair.
///
/// Derived from the file's absolute path, size, modification time, and the
/// reader's discriminator string. Two readers with different discriminators
/// over the same file produce different keys, and a file mutated on disk
/// produces a new key; the old record is simply orphaned until eviction
/// removes it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileKey([u8; 32]);

impl FileKey {
    /// Derives the fingerprint for a file as seen by a particular reader.
    ///
    /// Pure function of its inputs: no I/O is performed here. Callers stat
    /// the file themselves and pass the size and modification time in.
    /// Every variable-length field is length-prefixed before hashing so
    /// adjacent fields cannot alias.
    pub fn derive(path: &Path, size: u64, mtime: SystemTime, discriminator: &str) -> Self {
        let mtime_nanos = mtime
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_nanos();

        let mut hasher = Sha256::new();
        let path_bytes = path.to_string_lossy();
        let path_bytes = path_bytes.as_bytes();
        hasher.update((path_bytes.len() as u64).to_le_bytes());
        hasher.update(path_bytes);
        hasher.update(size.to_le_bytes());
        hasher.update(mtime_nanos.to_le_bytes());
        hasher.update((discriminator.len() as u64).to_le_bytes());
        hasher.update(discriminator.as_bytes());

        let digest = hasher.finalize();
        let mut key = [0u8; 32];
        key.copy_from_slice(&digest);
        Self(key)
    }

    /// Parses a key back from its 64-character hex form.
    ///
    /// Returns `None` for anything that is not exactly 64 hex digits. Used
    /// by backends that store keys as text.
    pub fn from_hex(s: &str) -> Option<Self> {
        if s.len() != 64 || !s.is_ascii() {
            return None;
        }
        let bytes = s.as_bytes();
        let mut key = [0u8; 32];
        for (i, out) in key.iter_mut().enumerate() {
            let hi = (bytes[2 * i] as char).to_digit(16)?;
            let lo = (bytes[2 * i + 1] as char).to_digit(16)?;
            *out = ((hi << 4) | lo) as u8;
        }
        Some(Self(key))
    }
}

impl fmt::Display for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for FileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileKey({:02x}{:02x}..)", self.0[0], self.0[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mtime(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[test]
    fn deterministic() {
        let a = FileKey::derive(Path::new("/data/run1.trj"), 1024, mtime(1000), "frame-bin/v1");
        let b = FileKey::derive(Path::new("/data/run1.trj"), 1024, mtime(1000), "frame-bin/v1");
        assert_eq!(a, b);
    }

    #[test]
    fn discriminator_changes_key() {
        let a = FileKey::derive(Path::new("/data/run1.trj"), 1024, mtime(1000), "frame-bin/v1");
        let b = FileKey::derive(Path::new("/data/run1.trj"), 1024, mtime(1000), "delimited/v1");
        assert_ne!(a, b);
    }

    #[test]
    fn size_changes_key() {
        let a = FileKey::derive(Path::new("/data/run1.trj"), 1024, mtime(1000), "frame-bin/v1");
        let b = FileKey::derive(Path::new("/data/run1.trj"), 1025, mtime(1000), "frame-bin/v1");
        assert_ne!(a, b);
    }

    #[test]
    fn mtime_changes_key() {
        let a = FileKey::derive(Path::new("/data/run1.trj"), 1024, mtime(1000), "frame-bin/v1");
        let b = FileKey::derive(Path::new("/data/run1.trj"), 1024, mtime(1001), "frame-bin/v1");
        assert_ne!(a, b);
    }

    #[test]
    fn field_boundaries_do_not_alias() {
        // Without length prefixes, path "ab" + discriminator "c" could hash
        // the same as path "a" + discriminator "bc".
        let a = FileKey::derive(Path::new("ab"), 0, mtime(0), "c");
        let b = FileKey::derive(Path::new("a"), 0, mtime(0), "bc");
        assert_ne!(a, b);
    }

    #[test]
    fn display_is_hex() {
        let key = FileKey::derive(Path::new("/data/run1.trj"), 1024, mtime(1000), "frame-bin/v1");
        let s = format!("{key}");
        assert_eq!(s.len(), 64, "Display should be 64 hex chars");
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn debug_abbreviated() {
        let key = FileKey::derive(Path::new("/data/run1.trj"), 1024, mtime(1000), "frame-bin/v1");
        let s = format!("{key:?}");
        assert!(s.starts_with("FileKey("));
        assert!(s.ends_with(")"));
    }

    #[test]
    fn hex_roundtrip() {
        let key = FileKey::derive(Path::new("/data/run1.trj"), 1024, mtime(1000), "frame-bin/v1");
        let parsed = FileKey::from_hex(&key.to_string()).unwrap();
        assert_eq!(key, parsed);
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(FileKey::from_hex("").is_none());
        assert!(FileKey::from_hex("zz").is_none());
        assert!(FileKey::from_hex(&"a".repeat(63)).is_none());
        assert!(FileKey::from_hex(&"g".repeat(64)).is_none());
    }

    #[test]
    fn serde_roundtrip() {
        let key = FileKey::derive(Path::new("/data/run1.trj"), 1024, mtime(1000), "frame-bin/v1");
        let json = serde_json::to_string(&key).unwrap();
        let back: FileKey = serde_json::from_str(&json).unwrap();
        assert_eq!(key, back);
    }
}
