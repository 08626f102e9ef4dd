use std::fs::{self, File};
use std::io::Read;

use mp3count_frame::{scan_buffer, FrameReader, ScanConfig, ScanSummary};
use tracing::{debug, warn};

use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use crate::upload::Upload;

/// How the bytes of an upload are handed to the scanner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanMode {
    /// Whole-buffer for inputs up to `in_memory_threshold`, streaming above.
    #[default]
    Auto,
    /// Read the whole upload into memory and scan it in one piece.
    Buffer,
    /// Read and scan the upload chunk by chunk.
    Stream,
}

impl ScanMode {
    /// Pick a concrete mode for an input of `size` bytes.
    pub fn resolve(self, size: u64, config: &IngestConfig) -> Self {
        match self {
            Self::Auto if size <= config.in_memory_threshold => Self::Buffer,
            Self::Auto => Self::Stream,
            other => other,
        }
    }
}

/// Scan an accepted upload.
pub fn count_upload(upload: &Upload, mode: ScanMode, config: &IngestConfig) -> Result<ScanSummary> {
    let path = upload.path();
    let mode = mode.resolve(upload.size(), config);
    debug!(path = ?path, size = upload.size(), ?mode, "scanning upload");

    let summary = match mode {
        ScanMode::Buffer => {
            let bytes = fs::read(path).map_err(|err| IngestError::io(path, err))?;
            scan_buffer(&bytes)?
        }
        ScanMode::Stream | ScanMode::Auto => {
            let file = File::open(path).map_err(|err| IngestError::io(path, err))?;
            let scan_config = ScanConfig {
                read_chunk_size: config.read_chunk_size,
            };
            FrameReader::with_config(file, scan_config).summarize()?
        }
    };

    debug!(frames = summary.frames, skipped = summary.skipped, "scan complete");
    Ok(summary)
}

/// Spool `reader`, scan it, and release the spooled file whatever the
/// outcome.
pub fn count_spooled<R: Read>(
    reader: R,
    declared_type: Option<&str>,
    mode: ScanMode,
    config: &IngestConfig,
) -> Result<ScanSummary> {
    let upload = Upload::spool(reader, declared_type, config)?;
    let outcome = count_upload(&upload, mode, config);
    release_after(upload, outcome)
}

/// Accept a file on disk and scan it.
pub fn count_path(
    path: impl AsRef<std::path::Path>,
    declared_type: Option<&str>,
    mode: ScanMode,
    config: &IngestConfig,
) -> Result<ScanSummary> {
    let upload = Upload::from_path(path, declared_type, config)?;
    let outcome = count_upload(&upload, mode, config);
    release_after(upload, outcome)
}

fn release_after(upload: Upload, outcome: Result<ScanSummary>) -> Result<ScanSummary> {
    let released = upload.release();
    let summary = outcome?;
    if let Err(err) = released {
        warn!(error = %err, "scan succeeded but upload release failed");
        return Err(err);
    }
    Ok(summary)
}

/// Scan an accepted upload on the tokio runtime.
#[cfg(feature = "async")]
pub async fn count_upload_async(upload: &Upload, config: &IngestConfig) -> Result<ScanSummary> {
    let path = upload.path();
    debug!(path = ?path, size = upload.size(), "scanning upload (async)");

    let file = tokio::fs::File::open(path)
        .await
        .map_err(|err| IngestError::io(path, err))?;
    let scan_config = ScanConfig {
        read_chunk_size: config.read_chunk_size,
    };
    Ok(mp3count_frame::scan_async(file, scan_config).await?)
}
