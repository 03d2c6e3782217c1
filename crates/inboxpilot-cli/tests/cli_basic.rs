//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against the dev data
//! directory and verify outputs. Nothing here touches the network.

use std::io::Write;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "inboxpilot-cli", "--"])
        .args(args)
        .env("INBOXPILOT_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_help() {
    let (stdout, _, code) = run_cli(&["--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Email-driven calendar automation"));
}

#[test]
fn test_config_path() {
    let (stdout, _, code) = run_cli(&["config", "path"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("config.toml"));
}

#[test]
fn test_config_show_prints_defaults() {
    let (stdout, _, code) = run_cli(&["config", "show"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("[automation]"));
    assert!(stdout.contains("poll_interval_secs"));
}

#[test]
fn test_events_list_runs() {
    let (stdout, _, code) = run_cli(&["events", "list"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("events") || stdout.contains("No events found."));
}

#[test]
fn test_streak_show_runs() {
    let (stdout, _, code) = run_cli(&["streak", "show"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Streak:"));
}

#[test]
fn test_extract_keyword_only() {
    let dir = std::env::temp_dir();
    let path = dir.join("inboxpilot_cli_extract_test.txt");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "Reminder: your exam is on 05/03/2099 at 2:30pm").unwrap();

    let (stdout, _, code) = run_cli(&["extract", "--no-oracle", path.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("\"exam\""), "stdout was: {stdout}");
    assert!(stdout.contains("2099-03-05"));
}

#[test]
fn test_extract_rejects_junk() {
    let dir = std::env::temp_dir();
    let path = dir.join("inboxpilot_cli_junk_test.txt");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "Huge discounts this weekend only!").unwrap();

    let (stdout, _, code) = run_cli(&["extract", "--no-oracle", path.to_str().unwrap()]);
    assert_eq!(code, 0);
    assert!(stdout.contains("No actionable content."));
}
