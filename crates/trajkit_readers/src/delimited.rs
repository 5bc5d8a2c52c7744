//! Reader for delimited text trajectories.
//!
//! One frame per line, values separated by a configurable delimiter
//! (ASCII whitespace by default). Lines vary in byte length, so the scan
//! records the starting offset of every frame; seeking later means a
//! single table lookup instead of re-reading the file.

use crate::error::ReaderError;
use crate::reader::{TrajMeta, TrajReader};
use std::path::Path;

/// Reader for delimited text trajectory files.
///
/// The delimiter is part of the reader's identity: the same file scanned
/// with a different delimiter is a different trajectory, so it feeds the
/// discriminator and therefore the cache key.
#[derive(Debug, Default, Clone)]
pub struct DelimitedTextReader {
    delimiter: Option<char>,
}

impl DelimitedTextReader {
    /// Creates a reader splitting columns on ASCII whitespace.
    pub fn new() -> Self {
        Self { delimiter: None }
    }

    /// Creates a reader splitting columns on the given character.
    pub fn with_delimiter(delimiter: char) -> Self {
        Self {
            delimiter: Some(delimiter),
        }
    }

    fn column_count(&self, line: &str) -> usize {
        match self.delimiter {
            Some(c) => line.split(c).count(),
            None => line.split_whitespace().count(),
        }
    }
}

impl TrajReader for DelimitedTextReader {
    fn scan(&self, path: &Path) -> Result<TrajMeta, ReaderError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ReaderError::invalid_input(path, e.to_string()))?;
        if text.is_empty() {
            return Err(ReaderError::invalid_input(path, "file is empty"));
        }

        let mut offsets = Vec::new();
        let mut ndim: Option<usize> = None;
        let mut pos = 0usize;
        for line in text.split_inclusive('\n') {
            let start = pos;
            pos += line.len();

            let content = line.trim_end_matches('\n').trim_end_matches('\r');
            if content.trim().is_empty() {
                continue;
            }

            let cols = self.column_count(content);
            match ndim {
                None => ndim = Some(cols),
                Some(n) if n != cols => {
                    return Err(ReaderError::malformed(
                        path,
                        format!(
                            "inconsistent column count: expected {n}, found {cols} at byte {start}"
                        ),
                    ));
                }
                Some(_) => {}
            }
            offsets.push(start as i64);
        }

        let ndim = ndim.ok_or_else(|| ReaderError::invalid_input(path, "no data lines"))?;
        Ok(TrajMeta {
            length: offsets.len() as i64,
            ndim: ndim as i32,
            offsets,
        })
    }

    fn discriminator(&self) -> String {
        match self.delimiter {
            Some(c) => format!("delimited-text/v1:{c}"),
            None => "delimited-text/v1:ws".to_string(),
        }
    }
}
