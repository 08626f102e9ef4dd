use std::path::{Path, PathBuf};

use mp3count_frame::ScanSummary;
use mp3count_ingest::{count_upload, count_upload_async, IngestConfig, Upload};

use crate::cmd::{accept, CountArgs, ModeArg};
use crate::exit::{ingest_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_counts, CountOutput, OutputFormat};

pub fn run(args: CountArgs, format: OutputFormat) -> CliResult<i32> {
    let config = args.policy.to_config()?;
    let inputs = if args.inputs.is_empty() {
        vec![PathBuf::from("-")]
    } else {
        args.inputs.clone()
    };

    let runtime = match args.mode {
        ModeArg::Async => Some(
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|err| CliError::new(INTERNAL, format!("runtime setup failed: {err}")))?,
        ),
        _ => None,
    };

    let mut rows = Vec::with_capacity(inputs.len());
    let mut exit_code = SUCCESS;

    for input in &inputs {
        let name = input.display().to_string();
        match count_one(input, &args, &config, runtime.as_ref()) {
            Ok(summary) => {
                tracing::info!(input = %name, frames = summary.frames, "counted frames");
                rows.push(CountOutput::success(&name, &summary));
            }
            Err(err) => {
                tracing::warn!(input = %name, code = err.code, "count failed: {err}");
                if exit_code == SUCCESS {
                    exit_code = err.code;
                }
                rows.push(CountOutput::failure(&name, err.message));
            }
        }
    }

    print_counts(&rows, format);
    Ok(exit_code)
}

fn count_one(
    input: &Path,
    args: &CountArgs,
    config: &IngestConfig,
    runtime: Option<&tokio::runtime::Runtime>,
) -> CliResult<ScanSummary> {
    let name = input.display().to_string();
    let upload = accept(input, &args.policy, config)?;
    let outcome = scan(&upload, args.mode, config, runtime);
    let released = upload.release();

    let summary = outcome.map_err(|err| ingest_error(&name, err))?;
    released.map_err(|err| ingest_error(&name, err))?;
    Ok(summary)
}

fn scan(
    upload: &Upload,
    mode: ModeArg,
    config: &IngestConfig,
    runtime: Option<&tokio::runtime::Runtime>,
) -> mp3count_ingest::Result<ScanSummary> {
    match runtime {
        Some(runtime) => runtime.block_on(count_upload_async(upload, config)),
        None => count_upload(upload, mode.scan_mode(), config),
    }
}
