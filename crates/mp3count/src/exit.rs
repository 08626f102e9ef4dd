use std::fmt;
use std::io;

use mp3count_frame::ScanError;
use mp3count_ingest::IngestError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn scan_error(context: &str, err: ScanError) -> CliError {
    match err {
        ScanError::Read(source) => io_error(context, source),
        ScanError::EmptyInput | ScanError::NoFramesFound => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}

pub fn ingest_error(context: &str, err: IngestError) -> CliError {
    match err {
        IngestError::Scan(err) => scan_error(context, err),
        IngestError::Io { source, path } => {
            io_error(&format!("{context}: {}", path.display()), source)
        }
        IngestError::TooLarge { .. }
        | IngestError::LimitExceeded { .. }
        | IngestError::UnsupportedContentType(_) => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
    }
}
