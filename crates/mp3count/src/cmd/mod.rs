use clap::{Args, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use mp3count_ingest::{IngestConfig, ScanMode, Upload};

use crate::exit::{ingest_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod count;
pub mod frames;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Count the audio frames of one or more inputs.
    Count(CountArgs),
    /// List the frames of a single input.
    Frames(FramesArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Count(args) => count::run(args, format),
        Command::Frames(args) => frames::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Limits applied to every input before it is scanned.
#[derive(Args, Debug, Clone)]
pub struct PolicyArgs {
    /// Maximum input size (e.g. 64M, 512K, 1048576).
    #[arg(long, value_name = "SIZE", env = "MP3COUNT_MAX_SIZE", default_value = "64M")]
    pub max_size: String,
    /// Declared content type. Files default to their extension, stdin to audio/mpeg.
    #[arg(long, value_name = "TYPE")]
    pub content_type: Option<String>,
    /// Bytes per read when streaming (e.g. 8K).
    #[arg(long, value_name = "SIZE", env = "MP3COUNT_CHUNK_SIZE", default_value = "8K")]
    pub chunk_size: String,
    /// Directory for spooling stdin. Default: system temp dir.
    #[arg(long, value_name = "DIR", env = "MP3COUNT_SPOOL_DIR")]
    pub spool_dir: Option<PathBuf>,
}

impl PolicyArgs {
    pub fn to_config(&self) -> CliResult<IngestConfig> {
        let read_chunk_size = usize::try_from(parse_size(&self.chunk_size)?)
            .map_err(|_| CliError::new(USAGE, "chunk size out of range"))?;
        Ok(IngestConfig {
            max_upload_size: parse_size(&self.max_size)?,
            read_chunk_size,
            spool_dir: self.spool_dir.clone(),
            ..IngestConfig::default()
        })
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Whole-buffer for small inputs, streaming for large ones.
    #[default]
    Auto,
    /// Read the whole input, then scan.
    Buffer,
    /// Scan while reading.
    Stream,
    /// Scan while reading, on the tokio runtime.
    Async,
}

impl ModeArg {
    pub fn scan_mode(self) -> ScanMode {
        match self {
            ModeArg::Auto => ScanMode::Auto,
            ModeArg::Buffer => ScanMode::Buffer,
            ModeArg::Stream | ModeArg::Async => ScanMode::Stream,
        }
    }
}

#[derive(Args, Debug)]
pub struct CountArgs {
    /// Input files. `-` or no argument reads stdin.
    pub inputs: Vec<PathBuf>,
    /// How input bytes are fed to the scanner.
    #[arg(long, value_enum, default_value_t = ModeArg::Auto)]
    pub mode: ModeArg,
    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[derive(Args, Debug)]
pub struct FramesArgs {
    /// Input file, or `-` for stdin.
    pub input: PathBuf,
    /// Stop after N frames.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: Option<u64>,
    #[command(flatten)]
    pub policy: PolicyArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// True if the path names stdin.
pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Accept one input: stdin is spooled, files are checked in place.
pub fn accept(
    input: &Path,
    policy: &PolicyArgs,
    config: &IngestConfig,
) -> CliResult<Upload> {
    let name = input.display().to_string();
    let upload = if is_stdin(input) {
        let declared = policy.content_type.as_deref().or(Some("audio/mpeg"));
        Upload::spool(std::io::stdin().lock(), declared, config)
    } else {
        Upload::from_path(input, policy.content_type.as_deref(), config)
    };
    upload.map_err(|err| ingest_error(&name, err))
}

/// Parse a byte size with an optional K/M/G (binary) suffix.
pub fn parse_size(input: &str) -> CliResult<u64> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "size must not be empty"));
    }

    let upper = input.to_ascii_uppercase();
    let digits = upper.strip_suffix('B').unwrap_or(&upper);
    let (number, shift) = match digits.chars().last() {
        Some('K') => (&digits[..digits.len() - 1], 10),
        Some('M') => (&digits[..digits.len() - 1], 20),
        Some('G') => (&digits[..digits.len() - 1], 30),
        _ => (digits, 0),
    };

    let value: u64 = number
        .trim()
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid size: {input}")))?;
    if value == 0 {
        return Err(CliError::new(USAGE, "size must be greater than zero"));
    }

    value
        .checked_mul(1u64 << shift)
        .ok_or_else(|| CliError::new(USAGE, format!("size out of range: {input}")))
}
