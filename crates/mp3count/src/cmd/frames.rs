use std::fs::File;
use std::path::Path;

use mp3count_frame::{Frame, FrameReader, ScanConfig, ScanError};

use crate::cmd::{accept, FramesArgs};
use crate::exit::{ingest_error, io_error, scan_error, CliResult, SUCCESS};
use crate::output::{print_frames, OutputFormat};

pub fn run(args: FramesArgs, format: OutputFormat) -> CliResult<i32> {
    let config = args.policy.to_config()?;
    let name = args.input.display().to_string();
    let upload = accept(&args.input, &args.policy, &config)?;
    let empty = upload.size() == 0;

    let listed = list_frames(upload.path(), config.read_chunk_size, args.limit);
    upload
        .release()
        .map_err(|err| ingest_error(&name, err))?;
    let frames = listed.map_err(|err| match err {
        ListError::Open(err) => io_error(&name, err),
        ListError::Scan(err) => scan_error(&name, err),
    })?;

    if empty {
        return Err(scan_error(&name, ScanError::EmptyInput));
    }
    if frames.is_empty() {
        return Err(scan_error(&name, ScanError::NoFramesFound));
    }

    print_frames(&frames, format);
    Ok(SUCCESS)
}

enum ListError {
    Open(std::io::Error),
    Scan(ScanError),
}

fn list_frames(
    path: &Path,
    read_chunk_size: usize,
    limit: Option<u64>,
) -> Result<Vec<(u64, Frame)>, ListError> {
    let file = File::open(path).map_err(ListError::Open)?;
    let reader = FrameReader::with_config(file, ScanConfig { read_chunk_size });

    let mut frames = Vec::new();
    for (index, frame) in (1u64..).zip(reader) {
        if limit.is_some_and(|limit| index > limit) {
            break;
        }
        frames.push((index, frame.map_err(ListError::Scan)?));
    }
    Ok(frames)
}
