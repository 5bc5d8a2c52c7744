//! Error types for cache operations.

use trajkit_readers::ReaderError;

/// A backend operation failed.
///
/// Backend failures are never surfaced to callers: the facade answers them
/// by substituting a volatile backend and redoing the lookup, so this type
/// only travels between the cache's internal layers.
#[derive(Debug, thiserror::Error)]
#[error("cache backend failure: {reason}")]
pub struct BackendError {
    /// Description of the failure.
    pub reason: String,
}

impl BackendError {
    /// Creates a new backend error with the given description.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Either side of a failed lookup step.
///
/// Reader failures belong to the caller and propagate unchanged; backend
/// failures belong to the cache and trigger the volatile fallback.
#[derive(Debug)]
pub enum LookupError {
    /// The reader rejected or could not scan the input.
    Reader(ReaderError),
    /// The backend misbehaved.
    Backend(BackendError),
}
