//! Error types for trajectory readers.

use std::path::PathBuf;

/// Errors that can occur while scanning a trajectory file.
///
/// These propagate unchanged through the metadata cache to the original
/// caller: a reader failure is a caller-facing condition, never something
/// the cache swallows or retries.
#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    /// The input cannot be used at all: it does not exist, is not
    /// readable, or is empty.
    #[error("invalid input {path}: {reason}")]
    InvalidInput {
        /// The offending path.
        path: PathBuf,
        /// Description of why the input is unusable.
        reason: String,
    },

    /// The file is readable but its content does not match the reader's
    /// format.
    #[error("malformed file {path}: {reason}")]
    Malformed {
        /// The offending path.
        path: PathBuf,
        /// Description of the format violation.
        reason: String,
    },

    /// An I/O error occurred partway through a scan.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// The path being scanned.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl ReaderError {
    /// Builds an [`ReaderError::InvalidInput`] for the given path.
    pub fn invalid_input(path: &std::path::Path, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Builds a [`ReaderError::Malformed`] for the given path.
    pub fn malformed(path: &std::path::Path, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn invalid_input_display() {
        let err = ReaderError::invalid_input(Path::new("/data/missing.trj"), "file is empty");
        let msg = err.to_string();
        assert!(msg.contains("invalid input"));
        assert!(msg.contains("missing.trj"));
        assert!(msg.contains("file is empty"));
    }

    #[test]
    fn malformed_display() {
        let err = ReaderError::malformed(Path::new("bad.trj"), "bad magic");
        let msg = err.to_string();
        assert!(msg.contains("malformed file"));
        assert!(msg.contains("bad magic"));
    }

    #[test]
    fn io_display() {
        let err = ReaderError::Io {
            path: PathBuf::from("/data/run.trj"),
            source: std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof"),
        };
        assert!(err.to_string().contains("I/O error"));
    }
}
