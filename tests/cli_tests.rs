//! CLI integration tests
//!
//! These tests verify the CLI commands work correctly by running the binary.

#![cfg(feature = "cli")]

use std::fs;
use std::path::PathBuf;
use std::process::Command;

use tempfile::TempDir;

fn xmlrender_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_xmlrender"))
}

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn write_input(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write input");
    path
}

// ============================================================================
// Render Command Tests
// ============================================================================

#[test]
fn test_cli_render_basic() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.json", r#"{"_id": "7", "name": "x"}"#);

    let output = Command::new(xmlrender_bin())
        .args(["render", input.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "render should succeed");
    assert_eq!(
        stdout.trim_end(),
        "<response id=\"7\">\n    <name>x</name>\n</response>"
    );
}

#[test]
fn test_cli_render_flags() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.json", r#"{"items": ["a", "b"]}"#);

    let output = Command::new(xmlrender_bin())
        .args([
            "render",
            "--unwrapped-arrays",
            "--no-singularize",
            "--indent", "2",
            "--root", "feed",
            "--manifest",
            input.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "render with flags should succeed");
    assert!(stdout.starts_with("<?xml"), "should write a declaration");
    assert!(stdout.contains("<feed>\n  <items>a</items>\n  <items>b</items>\n</feed>"));
}

#[test]
fn test_cli_render_with_schema() {
    let output = Command::new(xmlrender_bin())
        .args([
            "render",
            "--schema",
            fixtures_dir().join("named_elements_only_schema.json").to_str().unwrap(),
            "--type", "schemaRoot",
            fixtures_dir().join("named_elements.json").to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "render with schema should succeed");
    assert!(stdout.contains("<single>one</single>"));
    assert!(stdout.contains("id=\"root\""));
    assert!(!stdout.contains("extra"), "unnamed keys should be suppressed");
}

#[test]
fn test_cli_render_to_file_with_config() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.json", r#"{"at": "2023-01-02T03:04:05Z"}"#);
    let config = write_input(&dir, "config.json", r#"{"dateFormat": "SQL", "rootElement": "event"}"#);
    let out = dir.path().join("out.xml");

    let output = Command::new(xmlrender_bin())
        .args([
            "render",
            "--parse-dates",
            "--config", config.to_str().unwrap(),
            "--output", out.to_str().unwrap(),
            input.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "render to file should succeed");
    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(written, "<event>\n    <at>2023-01-02 03:04:05</at>\n</event>\n");
}

#[test]
fn test_cli_render_unknown_date_format_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "in.json", r#"{"when": "2023-01-02T03:04:05Z"}"#);

    let output = Command::new(xmlrender_bin())
        .args([
            "render",
            "--parse-dates",
            "--date-format", "RFC",
            input.to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "unknown date format should fail");
    assert!(stderr.contains("when contained unknown_date_format"));
}

#[test]
fn test_cli_render_missing_file() {
    let output = Command::new(xmlrender_bin())
        .args(["render", "/nonexistent/input.json"])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "missing file should fail");
    assert!(stderr.contains("Error:"));
}

// ============================================================================
// Schema Command Tests
// ============================================================================

#[test]
fn test_cli_schema_summary() {
    let output = Command::new(xmlrender_bin())
        .args([
            "schema",
            fixtures_dir().join("valid_attributes_schema.json").to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "schema should succeed");
    assert!(stdout.contains("Types: 3"));
    assert!(stdout.contains("=== limitedRoot ==="));
    assert!(stdout.contains("attributes: id, name, path"));
    assert!(stdout.contains("allAttributes : allRoot"));
}

#[test]
fn test_cli_schema_json_output() {
    let output = Command::new(xmlrender_bin())
        .args([
            "schema",
            "--json",
            fixtures_dir().join("named_elements_only_schema.json").to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "schema --json should succeed");

    let json: serde_json::Value = serde_json::from_str(&stdout)
        .expect("Output should be valid JSON");

    assert_eq!(json["schemaRoot"]["includeNamedOnly"], true);
    assert_eq!(json["schemaRoot"]["elements"][1]["name"], "deeper");
    assert_eq!(json["deepRoot"]["elements"][0]["type"], serde_json::Value::Null);
}
