//! Async frame scanning over `tokio::io::AsyncRead` (feature `async`).

use bytes::{Buf, BytesMut};
use futures_util::StreamExt;
use tokio::io::AsyncRead;
use tokio_util::codec::{Decoder, FramedRead};

use crate::error::{Result, ScanError};
use crate::header::HEADER_SIZE;
use crate::reader::ScanConfig;
use crate::scanner::{scan_step, Frame, ScanSummary, Tally};

/// `tokio_util` decoder yielding MPEG audio frames.
///
/// The read buffer owned by `FramedRead` plays the role of the pending
/// buffer; an unfinished frame at end of stream is dropped silently.
#[derive(Debug, Default)]
pub struct FrameCodec {
    tally: Tally,
    remaining: usize,
}

impl FrameCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames decoded so far.
    pub fn frame_count(&self) -> u64 {
        self.tally.frames
    }

    /// Summarize once the stream has ended.
    pub fn finish(&self) -> Result<ScanSummary> {
        self.tally.finish(self.remaining)
    }

    fn observe(&mut self, src: &BytesMut) {
        // Everything consumed plus everything buffered is everything read.
        self.tally.bytes = self.tally.bytes.max(self.tally.position + src.len() as u64);
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = ScanError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        self.observe(src);
        let step = scan_step(src);
        src.advance(step.consumed());
        let frame = self.tally.record(step);
        if frame.is_none() && src.len() >= HEADER_SIZE {
            tracing::debug!(pending = src.len(), "frame incomplete, waiting for more data");
        }
        Ok(frame)
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }
        self.remaining = src.len();
        src.clear();
        Ok(None)
    }
}

/// Scan an async stream, reading with the configured chunk size.
pub async fn scan_async<R>(reader: R, config: ScanConfig) -> Result<ScanSummary>
where
    R: AsyncRead + Unpin,
{
    let capacity = config.read_chunk_size.max(HEADER_SIZE);
    let mut framed = FramedRead::with_capacity(reader, FrameCodec::new(), capacity);
    while let Some(frame) = framed.next().await {
        frame?;
    }
    framed.decoder().finish()
}

/// Count the frames of an async stream with the default configuration.
pub async fn count_frames_async<R>(reader: R) -> Result<u64>
where
    R: AsyncRead + Unpin,
{
    scan_async(reader, ScanConfig::default())
        .await
        .map(|summary| summary.frames)
}
