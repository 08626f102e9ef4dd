use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use mp3count_frame::{Frame, ScanSummary};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// One line of `count` output: a summary or the reason the input failed.
#[derive(Debug, Serialize)]
pub struct CountOutput {
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frames: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discarded: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CountOutput {
    pub fn success(input: &str, summary: &ScanSummary) -> Self {
        Self {
            input: input.to_string(),
            frames: Some(summary.frames),
            bytes: Some(summary.bytes),
            skipped: Some(summary.skipped),
            discarded: Some(summary.discarded),
            duration_secs: Some(round_millis(summary.duration.as_secs_f64())),
            error: None,
        }
    }

    pub fn failure(input: &str, message: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            frames: None,
            bytes: None,
            skipped: None,
            discarded: None,
            duration_secs: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize)]
struct FrameOutput {
    index: u64,
    offset: u64,
    size: usize,
    bitrate_kbps: u16,
    sample_rate: u32,
    padding: bool,
}

pub fn print_counts(rows: &[CountOutput], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for row in rows {
                println!(
                    "{}",
                    serde_json::to_string(row).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["INPUT", "FRAMES", "BYTES", "SKIPPED", "DURATION", "ERROR"]);
            for row in rows {
                table.add_row(vec![
                    row.input.clone(),
                    opt(row.frames),
                    opt(row.bytes),
                    opt(row.skipped),
                    row.duration_secs
                        .map(|secs| format!("{secs:.3}s"))
                        .unwrap_or_default(),
                    row.error.clone().unwrap_or_default(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in rows {
                match (&row.error, row.frames) {
                    (Some(error), _) => println!("{}: error: {error}", row.input),
                    (None, Some(frames)) => println!(
                        "{}: frames={frames} bytes={} skipped={} duration={:.3}s",
                        row.input,
                        opt(row.bytes),
                        opt(row.skipped),
                        row.duration_secs.unwrap_or_default()
                    ),
                    (None, None) => println!("{}", row.input),
                }
            }
        }
    }
}

pub fn print_frames(frames: &[(u64, Frame)], format: OutputFormat) {
    let rows = frames.iter().map(|(index, frame)| FrameOutput {
        index: *index,
        offset: frame.offset,
        size: frame.size(),
        bitrate_kbps: frame.header.bitrate_kbps,
        sample_rate: frame.header.sample_rate,
        padding: frame.header.padding,
    });

    match format {
        OutputFormat::Json => {
            for row in rows {
                println!(
                    "{}",
                    serde_json::to_string(&row).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["#", "OFFSET", "SIZE", "KBPS", "HZ", "PADDING"]);
            for row in rows {
                table.add_row(vec![
                    row.index.to_string(),
                    row.offset.to_string(),
                    row.size.to_string(),
                    row.bitrate_kbps.to_string(),
                    row.sample_rate.to_string(),
                    row.padding.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in rows {
                println!(
                    "#{} offset={} size={} bitrate={}kbps rate={}Hz padding={}",
                    row.index,
                    row.offset,
                    row.size,
                    row.bitrate_kbps,
                    row.sample_rate,
                    row.padding
                );
            }
        }
    }
}

fn opt(value: Option<u64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn round_millis(secs: f64) -> f64 {
    (secs * 1000.0).round() / 1000.0
}
