#![cfg(feature = "cli")]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

fn frames(n: usize) -> Vec<u8> {
    let mut frame = vec![0u8; 417];
    frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
    frame.repeat(n)
}

fn write_input(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("input should be writable");
    path
}

fn mp3count(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mp3count"))
        .args(["--log-level", "error", "--format", "json"])
        .args(args)
        .output()
        .expect("mp3count should run")
}

fn json_lines(output: &Output) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line should be json"))
        .collect()
}

#[test]
fn count_reports_frames_in_every_mode() {
    let dir = tempfile::tempdir().unwrap();
    let mut bytes = b"not a frame".to_vec();
    bytes.extend_from_slice(&frames(10));
    let path = write_input(dir.path(), "ten.mp3", &bytes);
    let path = path.to_str().unwrap();

    for mode in ["auto", "buffer", "stream", "async"] {
        let output = mp3count(&["count", path, "--mode", mode, "--chunk-size", "100"]);
        assert!(output.status.success(), "mode {mode}");
        let rows = json_lines(&output);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["frames"], 10, "mode {mode}");
        assert_eq!(rows[0]["skipped"], 11, "mode {mode}");
    }
}

#[test]
fn count_reads_stdin() {
    let mut child = Command::new(env!("CARGO_BIN_EXE_mp3count"))
        .args(["--log-level", "error", "--format", "json", "count", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("mp3count should start");

    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(&frames(3))
        .expect("stdin should accept bytes");
    let output = child.wait_with_output().expect("mp3count should finish");

    assert!(output.status.success());
    assert_eq!(json_lines(&output)[0]["frames"], 3);
}

#[test]
fn garbage_input_exits_60() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(dir.path(), "noise.mp3", &[0x42; 4096]);

    let output = mp3count(&["count", path.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(60));
    let rows = json_lines(&output);
    assert!(rows[0]["error"]
        .as_str()
        .is_some_and(|e| e.contains("no valid MPEG audio frames")));
}

#[test]
fn oversized_input_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(dir.path(), "big.mp3", &frames(4));

    let output = mp3count(&["count", path.to_str().unwrap(), "--max-size", "1K"]);
    assert_eq!(output.status.code(), Some(60));
    assert!(json_lines(&output)[0]["error"]
        .as_str()
        .is_some_and(|e| e.contains("too large")));
}

#[test]
fn wrong_extension_is_rejected_unless_declared() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(dir.path(), "track.bin", &frames(2));
    let path = path.to_str().unwrap();

    let rejected = mp3count(&["count", path]);
    assert_eq!(rejected.status.code(), Some(60));

    let accepted = mp3count(&["count", path, "--content-type", "audio/mpeg"]);
    assert!(accepted.status.success());
    assert_eq!(json_lines(&accepted)[0]["frames"], 2);
}

#[test]
fn mixed_inputs_report_each_and_fail_overall() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_input(dir.path(), "good.mp3", &frames(5));
    let empty = write_input(dir.path(), "empty.mp3", &[]);

    let output = mp3count(&["count", good.to_str().unwrap(), empty.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(60));
    let rows = json_lines(&output);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["frames"], 5);
    assert!(rows[1]["error"]
        .as_str()
        .is_some_and(|e| e.contains("empty input")));
}

#[test]
fn frames_lists_offsets() {
    let dir = tempfile::tempdir().unwrap();
    let mut bytes = vec![0u8; 3];
    bytes.extend_from_slice(&frames(4));
    let path = write_input(dir.path(), "four.mp3", &bytes);

    let output = mp3count(&["frames", path.to_str().unwrap(), "--limit", "2"]);
    assert!(output.status.success());
    let rows = json_lines(&output);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["offset"], 3);
    assert_eq!(rows[1]["offset"], 420);
    assert_eq!(rows[1]["size"], 417);
    assert_eq!(rows[1]["bitrate_kbps"], 128);
}

#[test]
fn frames_limit_must_be_positive() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_input(dir.path(), "three.mp3", &frames(3));
    let path = path.to_str().unwrap();

    let rejected = mp3count(&["frames", path, "--limit", "0"]);
    assert_eq!(rejected.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&rejected.stderr).contains("--limit"));
    assert!(rejected.stdout.is_empty());

    let one = mp3count(&["frames", path, "--limit", "1"]);
    assert!(one.status.success());
    let rows = json_lines(&one);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["offset"], 0);
}

#[test]
fn version_prints_name() {
    let output = mp3count(&["version"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("mp3count "));
}
