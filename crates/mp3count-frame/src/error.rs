/// Errors that can terminate a frame scan.
///
/// The scanner itself never fails mid-stream; these are only produced once
/// the byte source is exhausted or has failed.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The byte source contained no bytes at all.
    #[error("empty input")]
    EmptyInput,

    /// All data was consumed without accepting a single frame.
    #[error("no valid MPEG audio frames found")]
    NoFramesFound,

    /// The byte source failed while supplying chunks.
    #[error("read error: {0}")]
    Read(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;
