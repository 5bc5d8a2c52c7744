//! Reader for the uniform binary frame format.
//!
//! Layout: a 12-byte header (magic bytes, format version, frame
//! dimensionality) followed by frames of `ndim` little-endian `f64`
//! values each. Because every frame has the same size, the frame count
//! follows from the file size and no per-frame offset table is needed.

use crate::error::ReaderError;
use crate::reader::{TrajMeta, TrajReader};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Magic bytes identifying a binary frame file.
const FRAME_BIN_MAGIC: [u8; 4] = *b"TRJB";

/// Current format version. Increment on breaking layout changes.
const FRAME_BIN_VERSION: u32 = 1;

/// Header size: magic + version + ndim.
const HEADER_LEN: u64 = 12;

/// Upper bound on a plausible frame dimensionality. Values beyond this
/// indicate a corrupt header rather than real data.
const MAX_NDIM: u32 = 1 << 16;

/// Reader for uniform binary frame files.
///
/// The scan reads only the header and the file size: with uniform frames
/// the count is pure arithmetic, which is why this format never populates
/// an offset table.
#[derive(Debug, Default, Clone)]
pub struct FrameBinReader;

impl FrameBinReader {
    /// Creates a new reader.
    pub fn new() -> Self {
        Self
    }
}

impl TrajReader for FrameBinReader {
    fn scan(&self, path: &Path) -> Result<TrajMeta, ReaderError> {
        let mut file =
            File::open(path).map_err(|e| ReaderError::invalid_input(path, e.to_string()))?;
        let file_len = file
            .metadata()
            .map_err(|e| ReaderError::invalid_input(path, e.to_string()))?
            .len();
        if file_len == 0 {
            return Err(ReaderError::invalid_input(path, "file is empty"));
        }
        if file_len < HEADER_LEN {
            return Err(ReaderError::malformed(path, "truncated header"));
        }

        let mut header = [0u8; HEADER_LEN as usize];
        file.read_exact(&mut header).map_err(|e| ReaderError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        if header[..4] != FRAME_BIN_MAGIC {
            return Err(ReaderError::malformed(path, "bad magic bytes"));
        }
        let version = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        if version != FRAME_BIN_VERSION {
            return Err(ReaderError::malformed(
                path,
                format!("unsupported format version {version}"),
            ));
        }
        let ndim = u32::from_le_bytes([header[8], header[9], header[10], header[11]]);
        if ndim == 0 || ndim > MAX_NDIM {
            return Err(ReaderError::malformed(
                path,
                format!("implausible dimensionality {ndim}"),
            ));
        }

        let frame_size = ndim as u64 * 8;
        let payload = file_len - HEADER_LEN;
        if payload % frame_size != 0 {
            return Err(ReaderError::malformed(
                path,
                "payload is not a whole number of frames",
            ));
        }

        Ok(TrajMeta {
            length: (payload / frame_size) as i64,
            ndim: ndim as i32,
            offsets: vec![],
        })
    }

    fn discriminator(&self) -> String {
        format!("frame-bin/v{FRAME_BIN_VERSION}")
    }
}

/// Writes frames to `path` in the binary frame format.
///
/// All frames must share one dimensionality and at least one frame is
/// required, since an empty file is not a valid trajectory.
pub fn write_frames(path: &Path, frames: &[Vec<f64>]) -> Result<(), ReaderError> {
    let ndim = match frames.first() {
        Some(frame) if !frame.is_empty() => frame.len(),
        _ => {
            return Err(ReaderError::invalid_input(
                path,
                "at least one non-empty frame is required",
            ))
        }
    };
    if frames.iter().any(|f| f.len() != ndim) {
        return Err(ReaderError::invalid_input(
            path,
            "all frames must have the same dimensionality",
        ));
    }

    let mut out = Vec::with_capacity(HEADER_LEN as usize + frames.len() * ndim * 8);
    out.extend_from_slice(&FRAME_BIN_MAGIC);
    out.extend_from_slice(&FRAME_BIN_VERSION.to_le_bytes());
    out.extend_from_slice(&(ndim as u32).to_le_bytes());
    for frame in frames {
        for value in frame {
            out.extend_from_slice(&value.to_le_bytes());
        }
    }

    let mut file = File::create(path).map_err(|e| ReaderError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    file.write_all(&out).map_err(|e| ReaderError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}
