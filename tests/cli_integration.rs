// Integration tests for CLI commands
// These tests verify argument parsing and command execution through the
// real binary, without requiring a notary service to be running.

use std::process::Command;
use tempfile::TempDir;

fn binary_path() -> &'static str {
    env!("CARGO_BIN_EXE_sigil")
}

/// Write a minimal config pointing at a port nothing listens on
fn offline_config(temp_dir: &TempDir) -> String {
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        "[notary]\napi_url = \"http://127.0.0.1:1\"\n",
    )
    .unwrap();
    config_path.to_string_lossy().to_string()
}

#[test]
fn test_cli_help() {
    let output = Command::new(binary_path())
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Client CLI for a remote notary"));
    assert!(stdout.contains("run"));
    assert!(stdout.contains("sign"));
    assert!(stdout.contains("send"));
    assert!(stdout.contains("status"));
    assert!(stdout.contains("version"));
}

#[test]
fn test_cli_version() {
    let output = Command::new(binary_path())
        .arg("version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sigil"));
}

#[test]
fn test_cli_invalid_command() {
    let output = Command::new(binary_path())
        .arg("nonexistent")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn test_cli_send_requires_to() {
    let output = Command::new(binary_path())
        .args(["send", "hello"])
        .output()
        .expect("Failed to execute command");

    // --to is required
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--to") || stderr.contains("required"));
}

#[test]
fn test_cli_sign_requires_message() {
    let output = Command::new(binary_path())
        .arg("sign")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn test_cli_status_reports_unreachable_notary() {
    let temp_dir = TempDir::new().unwrap();
    let config = offline_config(&temp_dir);

    let output = Command::new(binary_path())
        .args(["status", "--config", config.as_str()])
        .output()
        .expect("Failed to execute command");

    // Status reports problems, it does not fail on them
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Sigil Status"));
    assert!(stdout.contains("unreachable"));
    assert!(stdout.contains("not configured"));
}

#[test]
fn test_cli_sign_fails_without_identity() {
    let temp_dir = TempDir::new().unwrap();
    let config = offline_config(&temp_dir);

    let output = Command::new(binary_path())
        .args(["sign", "hello", "--config", config.as_str()])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Not connected"));
}

#[test]
fn test_cli_sign_fails_against_unreachable_notary() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        "[notary]\napi_url = \"http://127.0.0.1:1\"\n\n\
         [node]\nname = \"alice.os\"\nprocess = \"sigil:sigil:template.os\"\n",
    )
    .unwrap();

    let config = config_path.to_string_lossy().to_string();
    let output = Command::new(binary_path())
        .args(["sign", "hello", "--config", config.as_str()])
        .output()
        .expect("Failed to execute command");

    // Transport failure surfaces as an error, and no entry was recorded
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error"));
}
