//! Shared foundational types for the trajkit toolkit.
//!
//! This crate provides the identity fingerprint used to key cached trajectory
//! metadata and the metadata record itself, shared between the reader
//! implementations and the cache.

#![warn(missing_docs)]

pub mod info;
pub mod key;

pub use info::TrajInfo;
pub use key::FileKey;
