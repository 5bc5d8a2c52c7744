//! Trajectory file readers.
//!
//! A reader knows one file format and can scan a file of that format to
//! compute its structural metadata (frame count, dimensionality, per-frame
//! offsets). Readers are the expensive collaborators the metadata cache
//! exists to avoid re-running: a scan may touch every byte of a multi-GiB
//! file.

#![warn(missing_docs)]

pub mod delimited;
pub mod error;
pub mod frame_bin;
pub mod memory;
pub mod reader;

pub use delimited::DelimitedTextReader;
pub use error::ReaderError;
pub use frame_bin::FrameBinReader;
pub use memory::InMemoryFrames;
pub use reader::{TrajMeta, TrajReader};
