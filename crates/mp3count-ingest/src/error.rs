use std::path::PathBuf;

use mp3count_frame::ScanError;

/// Errors that can occur while accepting or scanning an upload.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The upload exceeds the configured size limit.
    #[error("upload too large ({size} bytes, max {max})")]
    TooLarge { size: u64, max: u64 },

    /// A streamed upload ran past the size limit; its full size is unknown.
    #[error("upload too large (more than {max} bytes)")]
    LimitExceeded { max: u64 },

    /// The upload's content type is not accepted.
    #[error("unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// Failed opening, spooling or reading the upload.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The frame scan failed.
    #[error(transparent)]
    Scan(#[from] ScanError),
}

impl IngestError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
