use std::path::PathBuf;

use mp3count_frame::DEFAULT_READ_CHUNK_SIZE;

/// Default upload limit: 64 MiB.
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 64 * 1024 * 1024;

/// Default cutoff for scanning fully in memory: 1 MiB.
pub const DEFAULT_IN_MEMORY_THRESHOLD: u64 = 1024 * 1024;

/// Content types accepted by default.
pub const DEFAULT_CONTENT_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/mp3",
    "audio/mpeg3",
    "audio/x-mpeg-3",
];

/// Controls how uploads are accepted and scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestConfig {
    /// Largest accepted upload in bytes.
    pub max_upload_size: u64,
    /// Accepted MIME types, lowercase, without parameters.
    pub allowed_content_types: Vec<String>,
    /// Bytes per read when streaming.
    pub read_chunk_size: usize,
    /// In `ScanMode::Auto`, inputs up to this size are read whole.
    pub in_memory_threshold: u64,
    /// Directory for spooled uploads. `None` uses the system temp dir.
    pub spool_dir: Option<PathBuf>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            allowed_content_types: DEFAULT_CONTENT_TYPES
                .iter()
                .map(|ty| ty.to_string())
                .collect(),
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
            in_memory_threshold: DEFAULT_IN_MEMORY_THRESHOLD,
            spool_dir: None,
        }
    }
}
