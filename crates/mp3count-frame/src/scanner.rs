use std::time::Duration;

use bytes::{Buf, BytesMut};

use crate::error::{Result, ScanError};
use crate::header::{is_sync, FrameHeader, HEADER_SIZE};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Outcome of one pass over the front of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Bytes before the frame (or before the suspend point) that are not part
    /// of any frame and can be dropped.
    pub skipped: usize,
    /// The complete frame found right after `skipped`, if any.
    pub frame: Option<FrameHeader>,
}

impl Step {
    /// Bytes the caller must drop from the front of the buffer.
    pub fn consumed(&self) -> usize {
        self.skipped + self.frame.map_or(0, |header| header.frame_len())
    }
}

/// Find the next complete frame at the front of `buf`.
///
/// The cursor moves one byte at a time past anything that is not a sync
/// match with a valid header. When a valid header is found but its frame
/// extends past the end of `buf`, scanning stops with `frame: None` and the
/// cursor left on that header, so feeding more bytes resumes at the same
/// spot. Scanning also stops when fewer than four bytes remain.
pub fn scan_step(buf: &[u8]) -> Step {
    let mut cursor = 0usize;

    while cursor + HEADER_SIZE <= buf.len() {
        if !is_sync(buf[cursor], buf[cursor + 1]) {
            cursor += 1;
            continue;
        }

        let bits = u32::from_be_bytes([
            buf[cursor],
            buf[cursor + 1],
            buf[cursor + 2],
            buf[cursor + 3],
        ]);
        let Some(header) = FrameHeader::decode(bits) else {
            // A false sync may overlap a real one starting a byte later.
            cursor += 1;
            continue;
        };

        // Known-valid but not fully buffered: suspend on this header.
        let complete = cursor + header.frame_len() <= buf.len();
        return Step {
            skipped: cursor,
            frame: complete.then_some(header),
        };
    }

    Step {
        skipped: cursor,
        frame: None,
    }
}

/// An accepted frame and where it starts in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    /// Absolute byte offset of the frame header.
    pub offset: u64,
    pub header: FrameHeader,
}

impl Frame {
    /// Frame length in bytes, header included.
    pub fn size(&self) -> usize {
        self.header.frame_len()
    }
}

/// Final result of a successful scan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanSummary {
    /// Number of accepted frames.
    pub frames: u64,
    /// Total bytes delivered by the source.
    pub bytes: u64,
    /// Bytes stepped over while resynchronizing.
    pub skipped: u64,
    /// Bytes left over at end of stream, including an unfinished frame.
    pub discarded: u64,
    /// Estimated playback time of the accepted frames.
    pub duration: Duration,
}

/// Running totals shared by every driver.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Tally {
    pub position: u64,
    pub frames: u64,
    pub bytes: u64,
    pub skipped: u64,
    pub seconds: f64,
}

impl Tally {
    /// Account for a step and return the frame it accepted, if any.
    pub fn record(&mut self, step: Step) -> Option<Frame> {
        self.skipped += step.skipped as u64;
        self.position += step.skipped as u64;

        let header = step.frame?;
        let frame = Frame {
            offset: self.position,
            header,
        };
        self.position += header.frame_len() as u64;
        self.frames += 1;
        self.seconds += header.duration_secs();
        tracing::trace!(offset = frame.offset, len = frame.size(), "accepted frame");
        Some(frame)
    }

    /// Close out the scan. `remaining` is whatever is still unconsumed.
    pub fn finish(self, remaining: usize) -> Result<ScanSummary> {
        if self.bytes == 0 {
            return Err(ScanError::EmptyInput);
        }
        if remaining > 0 {
            tracing::debug!(remaining, "discarding unconsumed bytes at end of stream");
        }
        if self.frames == 0 {
            return Err(ScanError::NoFramesFound);
        }

        Ok(ScanSummary {
            frames: self.frames,
            bytes: self.bytes,
            skipped: self.skipped,
            discarded: remaining as u64,
            duration: Duration::from_secs_f64(self.seconds),
        })
    }
}

/// Incremental frame scanner.
///
/// Owns the bytes received so far that have not been consumed, including a
/// frame whose declared length runs past the data seen. Chunk boundaries do
/// not affect the result: feeding a stream in any partition yields the same
/// frames as scanning it in one piece.
#[derive(Debug)]
pub struct FrameScanner {
    pending: BytesMut,
    tally: Tally,
}

impl Default for FrameScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScanner {
    /// Create a scanner with an empty pending buffer.
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_BUFFER_CAPACITY)
    }

    /// Create a scanner with a pre-sized pending buffer.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: BytesMut::with_capacity(capacity),
            tally: Tally::default(),
        }
    }

    /// Append a chunk without scanning it.
    pub fn push(&mut self, chunk: &[u8]) {
        self.tally.bytes += chunk.len() as u64;
        self.pending.extend_from_slice(chunk);
    }

    /// Pull the next complete frame out of the pending bytes.
    ///
    /// Returns `None` once the pending bytes hold no further complete frame;
    /// push more data and call again.
    pub fn next_frame(&mut self) -> Option<Frame> {
        let step = scan_step(&self.pending);
        self.pending.advance(step.consumed());
        let frame = self.tally.record(step);
        if frame.is_none() && self.pending.len() >= HEADER_SIZE {
            tracing::debug!(
                pending = self.pending.len(),
                "frame incomplete, waiting for more data"
            );
        }
        frame
    }

    /// Append a chunk and scan it, returning the frames accepted from it.
    pub fn feed(&mut self, chunk: &[u8]) -> u64 {
        self.feed_with(chunk, |_| {})
    }

    /// Like [`feed`](Self::feed), calling `visit` for every accepted frame.
    pub fn feed_with<F: FnMut(Frame)>(&mut self, chunk: &[u8], mut visit: F) -> u64 {
        self.push(chunk);
        let mut accepted = 0;
        while let Some(frame) = self.next_frame() {
            visit(frame);
            accepted += 1;
        }
        accepted
    }

    /// Frames accepted so far.
    pub fn frame_count(&self) -> u64 {
        self.tally.frames
    }

    /// Total bytes pushed so far.
    pub fn bytes_seen(&self) -> u64 {
        self.tally.bytes
    }

    /// Bytes held back for the next chunk.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Signal end of data.
    ///
    /// Any unfinished frame is dropped without error. Fails with
    /// [`ScanError::EmptyInput`] if nothing was ever pushed and with
    /// [`ScanError::NoFramesFound`] if no frame was accepted.
    pub fn finish(self) -> Result<ScanSummary> {
        self.tally.finish(self.pending.len())
    }
}

/// Iterator over the frames of a fully resident buffer.
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    rest: &'a [u8],
    tally: Tally,
}

impl Frames<'_> {
    /// Summarize the scan after the iterator is exhausted.
    pub fn finish(mut self) -> Result<ScanSummary> {
        for _ in self.by_ref() {}
        self.tally.finish(self.rest.len())
    }
}

impl Iterator for Frames<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        let step = scan_step(self.rest);
        self.rest = &self.rest[step.consumed()..];
        self.tally.record(step)
    }
}

/// Iterate over the frames of a complete buffer without copying it.
pub fn frames(buf: &[u8]) -> Frames<'_> {
    Frames {
        rest: buf,
        tally: Tally {
            bytes: buf.len() as u64,
            ..Tally::default()
        },
    }
}

/// Scan a complete in-memory buffer.
pub fn scan_buffer(buf: &[u8]) -> Result<ScanSummary> {
    frames(buf).finish()
}

/// Count the frames in a complete in-memory buffer.
pub fn count_frames(buf: &[u8]) -> Result<u64> {
    scan_buffer(buf).map(|summary| summary.frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];
    const FRAME_LEN: usize = 417;

    fn frame() -> Vec<u8> {
        let mut bytes = vec![0u8; FRAME_LEN];
        bytes[..4].copy_from_slice(&HEADER);
        bytes
    }

    fn frames_n(n: usize) -> Vec<u8> {
        frame().repeat(n)
    }

    #[test]
    fn single_frame() {
        assert_eq!(count_frames(&frame()).unwrap(), 1);
    }

    #[test]
    fn ten_frames() {
        assert_eq!(count_frames(&frames_n(10)).unwrap(), 10);
    }

    #[test]
    fn empty_input() {
        assert!(matches!(count_frames(&[]), Err(ScanError::EmptyInput)));
        let scanner = FrameScanner::new();
        assert!(matches!(scanner.finish(), Err(ScanError::EmptyInput)));
    }

    #[test]
    fn garbage_only() {
        let garbage = vec![0x42u8; 2048];
        assert!(matches!(
            count_frames(&garbage),
            Err(ScanError::NoFramesFound)
        ));
    }

    #[test]
    fn sync_with_rejected_headers_only() {
        // Bitrate index 15 and sample-rate index 3 everywhere.
        let garbage = [0xFF, 0xFB, 0xF0, 0x00, 0xFF, 0xFB, 0x9C, 0x00].repeat(64);
        assert!(matches!(
            count_frames(&garbage),
            Err(ScanError::NoFramesFound)
        ));
    }

    #[test]
    fn tiny_input_is_not_empty() {
        assert!(matches!(
            count_frames(&[0xFF, 0xFB]),
            Err(ScanError::NoFramesFound)
        ));
    }

    #[test]
    fn resync_after_leading_garbage() {
        for n in [0usize, 1, 2, 3, 4, 5, 100, 1000] {
            let mut bytes = vec![0x11u8; n];
            bytes.extend_from_slice(&frame());
            let summary = scan_buffer(&bytes).unwrap();
            assert_eq!(summary.frames, 1, "leading garbage {n}");
            assert_eq!(summary.skipped, n as u64);
        }
    }

    #[test]
    fn rejected_sync_advances_one_byte() {
        // A false sync (bitrate index 15) whose second byte starts a real frame
        // one byte later would be missed by a full-header skip.
        let mut bytes = vec![0xFF];
        bytes.extend_from_slice(&frame());
        assert_eq!(count_frames(&bytes).unwrap(), 1);

        let mut bytes = vec![0xFF, 0xFF, 0xF0];
        bytes.extend_from_slice(&frame());
        assert_eq!(count_frames(&bytes).unwrap(), 1);
    }

    #[test]
    fn truncated_final_frame_is_discarded() {
        let mut bytes = frames_n(3);
        bytes.extend_from_slice(&frame()[..200]);
        let summary = scan_buffer(&bytes).unwrap();
        assert_eq!(summary.frames, 3);
        assert_eq!(summary.discarded, 200);
    }

    #[test]
    fn truncated_only_frame_is_no_frames() {
        assert!(matches!(
            count_frames(&frame()[..416]),
            Err(ScanError::NoFramesFound)
        ));
    }

    #[test]
    fn boundary_split_every_point() {
        let bytes = frame();
        for k in 1..FRAME_LEN {
            let mut scanner = FrameScanner::new();
            assert_eq!(scanner.feed(&bytes[..k]), 0, "split {k}");
            assert_eq!(scanner.feed(&bytes[k..]), 1, "split {k}");
            assert_eq!(scanner.finish().unwrap().frames, 1);
        }
    }

    #[test]
    fn byte_at_a_time_matches_whole_buffer() {
        let mut bytes = vec![0x00, 0xFF, 0xFB, 0xF0];
        bytes.extend_from_slice(&frames_n(4));
        bytes.extend_from_slice(&[0xAA; 37]);
        bytes.extend_from_slice(&frames_n(2));

        let mut scanner = FrameScanner::new();
        for byte in &bytes {
            scanner.feed(std::slice::from_ref(byte));
        }
        assert_eq!(scanner.finish().unwrap(), scan_buffer(&bytes).unwrap());
    }

    #[test]
    fn suspend_keeps_header_pending() {
        let bytes = frame();
        let mut scanner = FrameScanner::new();
        scanner.feed(&[0x01, 0x02, 0x03]);
        scanner.feed(&bytes[..100]);
        assert_eq!(scanner.pending_len(), 100);
        assert_eq!(scanner.frame_count(), 0);
    }

    #[test]
    fn pending_stays_bounded() {
        let bytes = frames_n(50);
        let mut scanner = FrameScanner::new();
        for chunk in bytes.chunks(1000) {
            scanner.feed(chunk);
            assert!(scanner.pending_len() < 1000 + FRAME_LEN);
        }
        assert_eq!(scanner.finish().unwrap().frames, 50);
    }

    #[test]
    fn offsets_are_absolute_and_increasing() {
        let mut bytes = vec![0x00; 7];
        bytes.extend_from_slice(&frames_n(3));

        let offsets: Vec<u64> = frames(&bytes).map(|f| f.offset).collect();
        assert_eq!(offsets, vec![7, 7 + 417, 7 + 834]);

        let mut streamed = Vec::new();
        let mut scanner = FrameScanner::new();
        for chunk in bytes.chunks(13) {
            scanner.feed_with(chunk, |f| streamed.push(f.offset));
        }
        assert_eq!(streamed, offsets);
    }

    #[test]
    fn duration_accumulates() {
        let summary = scan_buffer(&frames_n(10)).unwrap();
        let expected = 10.0 * 1152.0 / 44100.0;
        assert!((summary.duration.as_secs_f64() - expected).abs() < 1e-6);
    }
}
