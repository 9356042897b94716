//! Tests that run the built `classforge` binary
//!
//! Logging is switched off through the environment so stderr only carries
//! the CLI's own messages.

use std::path::Path;
use std::process::{Command, Output};

const STYLE_TREE: &str = r#"{
    "root_id": "1",
    "cells": {
        "u": {"id": "u", "parent_id": "1", "style": {"shape": "swimlane"}, "values": ["User"]},
        "u1": {"id": "u1", "parent_id": "u", "values": ["+id: int64 {pk, identity}\n+login: string {unique}"]},
        "u2": {"id": "u2", "parent_id": "u", "style": {"shape": "line"}},
        "u3": {"id": "u3", "parent_id": "u", "values": ["+disable(): bool"]}
    },
    "relationships": {}
}"#;

fn classforge(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_classforge"))
        .args(args)
        .env("CLASSFORGE_LOG_LEVEL", "off")
        .output()
        .expect("failed to run classforge")
}

fn write_input(dir: &Path) -> String {
    let path = dir.join("diagram.json");
    std::fs::write(&path, STYLE_TREE).unwrap();
    path.display().to_string()
}

#[test]
fn test_generate_two_targets() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let out = dir.path().join("out");

    let output = classforge(&[
        "generate",
        "-i",
        &input,
        "-t",
        "java,sql",
        "-o",
        &out.display().to_string(),
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("java: 1 file(s)"));
    assert!(stdout.contains("sql: 1 file(s)"));
    assert!(out.join("java").join("User.java").exists());
    let table = std::fs::read_to_string(out.join("sql").join("User.sql")).unwrap();
    assert!(table.starts_with("CREATE TABLE \"User\" ("));
}

#[test]
fn test_generate_unknown_target_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let out = dir.path().join("out");

    let output = classforge(&[
        "generate",
        "-i",
        &input,
        "-t",
        "cobol",
        "-o",
        &out.display().to_string(),
    ]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unsupported target: cobol"));
    assert!(!out.exists());
}

#[test]
fn test_validate_reports_counts() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());

    let output = classforge(&["validate", "-i", &input]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✓ Valid diagram: 1 classes, 2 properties, 1 methods"));
}

#[test]
fn test_targets_json() {
    let output = classforge(&["targets", "--json"]);
    assert!(output.status.success());
    let listing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listing["targets"].as_array().unwrap().len(), 7);
    assert!(listing["dialects"]
        .as_array()
        .unwrap()
        .iter()
        .any(|d| d == "sqlserver"));
}
