//! Tests for the `gno-deploy` binary.

use std::fs;
use std::process::{Command, Output};

use tempfile::TempDir;

fn workspace_with_files(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("failed to create temp dir");
    for (path, content) in files {
        let full_path = dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("failed to write file");
    }
    dir
}

fn gno_deploy(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gno-deploy"))
        .args(args)
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("failed to run gno-deploy")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn chain() -> TempDir {
    workspace_with_files(&[
        ("p/a/a.gno", "package a\n\nimport \"b\"\n"),
        ("p/b/b.gno", "package b\n"),
    ])
}

#[test]
fn analyze_json_is_parseable() {
    let dir = chain();
    let path = dir.path().to_string_lossy().into_owned();
    let output = gno_deploy(&["analyze", &path, "--format", "json"]);

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("stdout should be JSON");
    assert_eq!(value["order"], serde_json::json!(["b", "a"]));
}

#[test]
fn analyze_detailed_text_lists_imports() {
    let dir = chain();
    let path = dir.path().to_string_lossy().into_owned();
    let output = gno_deploy(&["analyze", &path, "--detailed"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("Package: a"));
    assert!(text.contains("Imports:"));
    assert!(text.contains("Deployment order:"));
}

#[test]
fn order_prints_only_the_sequence() {
    let dir = chain();
    let path = dir.path().to_string_lossy().into_owned();
    let output = gno_deploy(&["order", &path]);

    assert!(output.status.success());
    assert_eq!(stdout(&output), "Deployment order:\n  1. b\n  2. a\n");
}

#[test]
fn cycles_succeeds_when_cycles_exist() {
    let dir = workspace_with_files(&[
        ("p/a/a.gno", "package a\n\nimport \"b\"\n"),
        ("p/b/b.gno", "package b\n\nimport \"a\"\n"),
    ]);
    let path = dir.path().to_string_lossy().into_owned();
    let output = gno_deploy(&["cycles", &path]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("cyclic group"));
    assert!(text.contains("a → b → a"));
}

#[test]
fn unknown_format_fails() {
    let dir = chain();
    let path = dir.path().to_string_lossy().into_owned();
    let output = gno_deploy(&["analyze", &path, "--format", "xml"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unsupported output format"));
}

#[test]
fn empty_directory_fails() {
    let dir = TempDir::new().expect("failed to create temp dir");
    let path = dir.path().to_string_lossy().into_owned();
    let output = gno_deploy(&["analyze", &path]);

    assert!(!output.status.success());
}
