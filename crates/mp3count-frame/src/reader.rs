use std::io::{ErrorKind, Read};

use crate::error::{Result, ScanError};
use crate::scanner::{Frame, FrameScanner, ScanSummary};

/// Default size of each read from the underlying stream.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 8 * 1024;

/// Configuration for streaming scans.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Bytes requested from the source per read. Default: 8 KiB.
    pub read_chunk_size: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }
}

/// Reads MPEG audio frames from any `Read` stream.
///
/// Handles partial reads internally: frames that straddle read boundaries are
/// held until complete, and memory stays bounded by one read chunk plus one
/// frame regardless of stream length.
pub struct FrameReader<T> {
    inner: T,
    chunk: Vec<u8>,
    scanner: FrameScanner,
    eof: bool,
}

impl<T: Read> FrameReader<T> {
    /// Create a frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, ScanConfig::default())
    }

    /// Create a frame reader with explicit configuration.
    pub fn with_config(inner: T, config: ScanConfig) -> Self {
        let chunk_size = config.read_chunk_size.max(1);
        Self {
            inner,
            chunk: vec![0u8; chunk_size],
            scanner: FrameScanner::with_capacity(chunk_size),
            eof: false,
        }
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Ok(None)` at end of stream. A frame cut short by end of
    /// stream is never returned.
    pub fn read_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            if let Some(frame) = self.scanner.next_frame() {
                return Ok(Some(frame));
            }
            if self.eof {
                return Ok(None);
            }

            let read = match self.inner.read(&mut self.chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(ScanError::Read(err)),
            };

            if read == 0 {
                self.eof = true;
                continue;
            }

            self.scanner.push(&self.chunk[..read]);
        }
    }

    /// Drain the stream and summarize it.
    pub fn summarize(mut self) -> Result<ScanSummary> {
        while self.read_frame()?.is_some() {}
        self.scanner.finish()
    }

    /// Drain the stream and return the number of frames.
    pub fn count_frames(self) -> Result<u64> {
        self.summarize().map(|summary| summary.frames)
    }

    /// Frames accepted so far.
    pub fn frame_count(&self) -> u64 {
        self.scanner.frame_count()
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read> Iterator for FrameReader<T> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_frame().transpose()
    }
}

/// Scan a stream with the default read chunk size.
pub fn scan_reader<R: Read>(reader: R) -> Result<ScanSummary> {
    FrameReader::new(reader).summarize()
}
