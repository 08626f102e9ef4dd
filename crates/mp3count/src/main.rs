mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "mp3count", version, about = "Count MPEG-1 Layer III audio frames")]
struct Cli {
    /// Output format. Default: table on a terminal, json otherwise.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(
        long,
        value_name = "LEVEL",
        default_value = "warn",
        env = "MP3COUNT_LOG",
        global = true
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::ModeArg;

    #[test]
    fn parses_count_with_multiple_inputs() {
        let cli = Cli::try_parse_from([
            "mp3count",
            "count",
            "a.mp3",
            "b.mp3",
            "--mode",
            "stream",
            "--max-size",
            "10M",
        ])
        .expect("count args should parse");

        match cli.command {
            Command::Count(args) => {
                assert_eq!(args.inputs.len(), 2);
                assert_eq!(args.mode, ModeArg::Stream);
                assert_eq!(args.policy.max_size, "10M");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn count_defaults_to_stdin_and_auto() {
        let cli = Cli::try_parse_from(["mp3count", "count"]).expect("bare count should parse");
        match cli.command {
            Command::Count(args) => {
                assert!(args.inputs.is_empty());
                assert_eq!(args.mode, ModeArg::Auto);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = Cli::try_parse_from(["mp3count", "count", "--mode", "turbo"])
            .expect_err("unknown mode should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn parses_frames_subcommand() {
        let cli = Cli::try_parse_from(["mp3count", "frames", "song.mp3", "--limit", "5"])
            .expect("frames args should parse");
        assert!(matches!(cli.command, Command::Frames(ref args) if args.limit == Some(5)));
    }

    #[test]
    fn rejects_zero_frame_limit() {
        let err = Cli::try_parse_from(["mp3count", "frames", "song.mp3", "--limit", "0"])
            .expect_err("zero limit should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
