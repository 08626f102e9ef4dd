//! Incremental MPEG-1 Layer III frame scanning.
//!
//! Frames are found without decoding audio: the scanner looks for the 11-bit
//! frame sync, sizes the frame from its bitrate and sample-rate fields, and
//! jumps straight to the next candidate. Anything that does not look like a
//! frame (tags, padding, garbage) is stepped over one byte at a time.
//!
//! The same scanner backs every driver:
//! - [`scan_buffer`] / [`frames`] for data already in memory
//! - [`FrameReader`] for blocking `Read` streams
//! - `FrameCodec` / `scan_async` for `tokio` streams (behind `async` feature)
//!
//! Chunk boundaries never change the result.

#[cfg(feature = "async")]
pub mod codec;
pub mod error;
pub mod header;
pub mod reader;
pub mod scanner;

#[cfg(feature = "async")]
pub use codec::{count_frames_async, scan_async, FrameCodec};
pub use error::{Result, ScanError};
pub use header::{frame_length, is_sync, FrameHeader, HEADER_SIZE, SAMPLES_PER_FRAME};
pub use reader::{scan_reader, FrameReader, ScanConfig, DEFAULT_READ_CHUNK_SIZE};
pub use scanner::{
    count_frames, frames, scan_buffer, scan_step, Frame, FrameScanner, Frames, ScanSummary, Step,
};
