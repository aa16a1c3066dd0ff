//! End-to-end runs of the `extract` and `compare` binaries.

use std::process::{Command, Output};

// Centred values (-0.5, 0.5, -0.5, 0.5) make the correlation exactly 1.
const E: &str = "[0,1,0,1]";

fn compare(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_compare"))
        .args(args)
        .output()
        .expect("failed to run compare")
}

fn extract(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_extract"))
        .args(args)
        .env("FACEPRINT_MODEL_PATH", "/nonexistent/seeta.bin")
        .output()
        .expect("failed to run extract")
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn test_compare_identical_prints_score_alone() {
    let out = compare(&[E, E]);
    assert_eq!(out.status.code(), Some(0), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out), "1.0\n");
}

#[test]
fn test_compare_verdict_line() {
    let out = compare(&["--verdict", E, E]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(stdout(&out), "1.0 match\n");
}

#[test]
fn test_compare_shape_mismatch() {
    let out = compare(&[E, "[0,1,0]"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("different lengths: 4 vs 3"), "{}", stderr(&out));
}

#[test]
fn test_compare_malformed_argument() {
    let out = compare(&[E, "[0,1,oops]"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("second encoding is not a valid numeric array"), "{}", stderr(&out));
}

#[test]
fn test_compare_missing_argument() {
    let out = compare(&[E]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("Usage"), "{}", stderr(&out));
}

#[test]
fn test_compare_help_exits_0() {
    let out = compare(&["--help"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(stdout(&out).contains("Usage"));
}

#[test]
fn test_extract_missing_file() {
    let out = extract(&["/nonexistent/face.png"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("file not found: /nonexistent/face.png"), "{}", stderr(&out));
}

#[test]
fn test_extract_missing_argument() {
    let out = extract(&[]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("Usage"), "{}", stderr(&out));
}

#[test]
fn test_extract_without_model() {
    let input = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml");
    let out = extract(&[input]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stdout(&out).is_empty());
    assert!(stderr(&out).contains("detector model not found"), "{}", stderr(&out));
}
