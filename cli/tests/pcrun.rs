use std::io::Write;
use std::process::{Command, Output};

use tempfile;

const PACKET: [u8; 20] = [
    0x45, 0x00, 0x00, 0x73, 0x00, 0x00, 0x40, 0x00, 0x40, 0x11, 0xb8, 0x61, 0xc0, 0xa8, 0x00, 0x01,
    0xc0, 0xa8, 0x00, 0xc7,
];

fn pcrun(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pcrun"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("should be able to run pcrun")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("pcrun output should be UTF-8")
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).expect("pcrun messages should be UTF-8")
}

fn packet_file(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".bin")
        .tempfile()
        .expect("should be able to create a temporary file");
    file.write_all(bytes)
        .expect("should be able to write the packet");
    file.flush().expect("should be able to flush the packet");
    file
}

#[test]
fn tagged_json() {
    let output = pcrun(&["--json", "tagged", "string:hi diceroll:2d6"]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("\"type\": \"diceroll\""), "{stdout}");
    assert!(stdout.contains("\"type\": \"string\""), "{stdout}");
}

#[test]
fn tagged_trailing_input_fails() {
    let output = pcrun(&["tagged", "number:42!"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).starts_with("parse failed: end_of_input"));
}

#[test]
fn array_json() {
    let output = pcrun(&["array", "--json", "[1,[2,[3],4],5]"]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let compact: String = stdout_of(&output)
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    assert_eq!(compact, "[1,[2,[3],4],5]");
}

#[test]
fn array_too_deep_fails_cleanly() {
    // A single argument can be at most 128 KiB long.
    for depth in [1000, 50_000] {
        let text = format!("{}{}", "[".repeat(depth), "]".repeat(depth));
        let output = pcrun(&["array", text.as_str()]);
        assert_eq!(output.status.code(), Some(1), "depth {depth}");
        let stderr = stderr_of(&output);
        assert!(
            stderr.starts_with("parse failed: recursive: nested more than 64 levels deep"),
            "depth {depth}: {stderr}"
        );
        assert_eq!(stderr.lines().count(), 1, "{stderr}");
    }
}

#[test]
fn array_at_nesting_limit_succeeds() {
    let text = format!("{}{}", "[".repeat(64), "]".repeat(64));
    let output = pcrun(&["--json", "array", text.as_str()]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
}

#[test]
fn sexpr_too_deep_fails_cleanly() {
    let mut text = "1".to_string();
    for _ in 0..1000 {
        text = format!("(- {text} 1)");
    }
    let output = pcrun(&["sexpr", text.as_str()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("nested more than 64 levels deep"));
}

#[test]
fn sexpr_evaluates() {
    let output = pcrun(&["--json", "sexpr", "(+ (* 10 2) (- (/ 50 3) 2))"]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(stdout_of(&output).contains("\"value\": 34"));
}

#[test]
fn sexpr_division_by_zero_fails() {
    let output = pcrun(&["sexpr", "(/ 1 0)"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stderr_of(&output).trim_end(), "evaluation failed: division by zero");
}

#[test]
fn ipv4_from_file() {
    let file = packet_file(&PACKET);
    let path = file.path().to_str().expect("temporary path should be UTF-8");
    let output = pcrun(&["--json", "ipv4", path]);
    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("\"source\": \"192.168.0.1\""), "{stdout}");
    assert!(stdout.contains("\"ttl\": 64"), "{stdout}");
}

#[test]
fn ipv4_truncated_file_fails() {
    let file = packet_file(&PACKET[..12]);
    let path = file.path().to_str().expect("temporary path should be UTF-8");
    let output = pcrun(&["ipv4", path]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("unexpected end of input"));
}

#[test]
fn ipv4_missing_file_fails() {
    let dir = tempfile::tempdir().expect("should be able to create a temporary directory");
    let missing = dir.path().join("no-such-packet.bin");
    let path = missing.to_str().expect("temporary path should be UTF-8");
    let output = pcrun(&["ipv4", path]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).starts_with(path));
}
