//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::TrajkitConfig;
use std::path::Path;

/// Loads and validates a `trajkit.toml` configuration from a directory.
///
/// Reads `<config_dir>/trajkit.toml`, parses it, and validates the cache
/// settings. A missing file yields the default configuration: every
/// setting has a default and the cache falls back to its volatile-only
/// mode without a store directory.
pub fn load_config(config_dir: &Path) -> Result<TrajkitConfig, ConfigError> {
    let config_path = config_dir.join("trajkit.toml");
    let content = match std::fs::read_to_string(&config_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(TrajkitConfig::default()),
        Err(e) => return Err(e.into()),
    };
    load_config_from_str(&content)
}

/// Parses and validates a `trajkit.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<TrajkitConfig, ConfigError> {
    let config: TrajkitConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that the cache settings are internally consistent.
fn validate_config(config: &TrajkitConfig) -> Result<(), ConfigError> {
    let cache = &config.cache;
    if cache.enabled && cache.max_size_kb == 0 {
        return Err(ConfigError::ValidationError(
            "cache.max_size_kb must be positive when the cache is enabled".to_string(),
        ));
    }
    if let Some(dir) = &cache.store_dir {
        if dir.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "cache.store_dir must not be empty; omit it for the volatile-only mode"
                    .to_string(),
            ));
        }
    }
    Ok(())
}
