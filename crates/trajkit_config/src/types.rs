//! Configuration types deserialized from `trajkit.toml`.

use serde::Deserialize;
use std::path::PathBuf;

/// Default ceiling for the on-disk store: 512 MiB expressed in KiB.
const DEFAULT_MAX_SIZE_KB: u64 = 512 * 1024;

/// The top-level configuration parsed from `trajkit.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct TrajkitConfig {
    /// Metadata cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Settings for the trajectory metadata cache, read once at backend
/// construction. Changes to the file are observed on the next
/// construction, not live.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Whether the cache is used at all. When `false`, lookups still
    /// return correct freshly-computed results but nothing is retained.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Maximum number of records the store may hold. Enforced by eviction
    /// immediately after every write, not by rejecting writes.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Approximate ceiling on the persistent store size, in KiB. The bound
    /// may be exceeded transiently between writes; eviction brings the
    /// store back under it at whole-record granularity.
    #[serde(default = "default_max_size_kb")]
    pub max_size_kb: u64,

    /// Directory holding the persistent store file. `None` selects the
    /// volatile-only mode: records live in memory for the process
    /// lifetime and nothing touches disk.
    #[serde(default)]
    pub store_dir: Option<PathBuf>,
}

fn default_enabled() -> bool {
    true
}

fn default_max_entries() -> usize {
    usize::MAX
}

fn default_max_size_kb() -> u64 {
    DEFAULT_MAX_SIZE_KB
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            max_entries: default_max_entries(),
            max_size_kb: default_max_size_kb(),
            store_dir: None,
        }
    }
}

impl CacheConfig {
    /// The size ceiling in bytes.
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_kb.saturating_mul(1024)
    }

    /// Returns `true` if no store directory is configured, i.e. the cache
    /// runs in its volatile-only mode.
    pub fn volatile_only(&self) -> bool {
        self.store_dir.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.max_entries, usize::MAX);
        assert_eq!(config.max_size_kb, 512 * 1024);
        assert!(config.volatile_only());
    }

    #[test]
    fn max_size_bytes_scales_kb() {
        let config = CacheConfig {
            max_size_kb: 2,
            ..CacheConfig::default()
        };
        assert_eq!(config.max_size_bytes(), 2048);
    }

    #[test]
    fn max_size_bytes_saturates() {
        let config = CacheConfig {
            max_size_kb: u64::MAX,
            ..CacheConfig::default()
        };
        assert_eq!(config.max_size_bytes(), u64::MAX);
    }

    #[test]
    fn store_dir_disables_volatile_only() {
        let config = CacheConfig {
            store_dir: Some(PathBuf::from("/var/cache/trajkit")),
            ..CacheConfig::default()
        };
        assert!(!config.volatile_only());
    }
}
