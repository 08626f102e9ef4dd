//! Ingestion layer for MP3 frame counting.
//!
//! Turns an input (a file on disk, or any reader spooled to a temporary
//! file) into an accepted [`Upload`], enforcing size and content-type policy,
//! then drives the frame scanner over it. Spooled files are always released,
//! whether the scan succeeds or fails.

pub mod config;
pub mod error;
pub mod policy;
pub mod scan;
pub mod upload;

pub use config::{IngestConfig, DEFAULT_IN_MEMORY_THRESHOLD, DEFAULT_MAX_UPLOAD_SIZE};
pub use error::{IngestError, Result};
#[cfg(feature = "async")]
pub use scan::count_upload_async;
pub use scan::{count_path, count_spooled, count_upload, ScanMode};
pub use upload::Upload;
