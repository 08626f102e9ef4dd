//! Count MPEG-1 Layer III audio frames without decoding audio.
//!
//! # Crate Structure
//!
//! - [`frame`]: header decoding and the incremental frame scanner
//! - [`ingest`]: upload spooling, input policy and scan drivers

/// Re-export frame types.
pub mod frame {
    pub use mp3count_frame::*;
}

/// Re-export ingestion types.
pub mod ingest {
    pub use mp3count_ingest::*;
}

pub use mp3count_frame::{count_frames, scan_buffer, FrameReader, FrameScanner, ScanError};
pub use mp3count_ingest::{count_path, count_spooled, IngestConfig, IngestError, ScanMode};
