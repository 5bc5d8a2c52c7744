//! Configuration loading for the trajkit toolkit.
//!
//! Parses and validates `trajkit.toml`, which carries the metadata cache
//! settings. A missing configuration file is not an error: every setting
//! has a default, and the default configuration runs the cache in its
//! volatile-only mode.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str};
pub use types::{CacheConfig, TrajkitConfig};
