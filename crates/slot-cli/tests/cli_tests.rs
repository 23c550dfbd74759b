//! Integration tests for the `slots` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the validate,
//! resolve, and check subcommands through the actual binary, including
//! stdin/stdout piping, file I/O, configuration, and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: absolute path to a fixture file.
fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn slots() -> Command {
    Command::cargo_bin("slots").unwrap()
}

/// Helper: run `slots resolve` and parse its JSON output.
fn resolve_json(args: &[&str]) -> Vec<String> {
    let output = slots().arg("resolve").args(args).output().unwrap();
    assert!(output.status.success(), "resolve failed: {:?}", output);
    serde_json::from_slice(&output.stdout).expect("resolve must print a JSON array")
}

// ─────────────────────────────────────────────────────────────────────────────
// Validate subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn validate_accepts_valid_form() {
    slots()
        .args(["validate", "-i", &fixture("schedule_form_valid.json")])
        .assert()
        .success()
        .stdout(predicate::str::contains("ok"));
}

#[test]
fn validate_reports_field_scoped_violations() {
    let output = slots()
        .args(["validate", "-i", &fixture("schedule_form_invalid.json")])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let violations: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let violations = violations.as_array().unwrap();
    assert_eq!(violations.len(), 3);

    assert!(violations
        .iter()
        .any(|v| v["index"] == 1 && v["field"] == "start_time" && v["kind"] == "overlap"));
    assert!(violations
        .iter()
        .any(|v| v["index"] == 2 && v["field"] == "end_time" && v["kind"] == "not_increasing"));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("3 availability violation(s)"));
}

#[test]
fn validate_from_stdin() {
    let input = r#"{"timezone":"UTC","availabilities":[
        {"day_of_week":"tuesday","start_time":"10:00","end_time":"11:00"}
    ]}"#;

    slots()
        .arg("validate")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("ok"));
}

#[test]
fn validate_rejects_malformed_json() {
    slots()
        .arg("validate")
        .write_stdin("{not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse schedule form JSON"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Resolve subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn resolve_filters_candidates() {
    let valid = resolve_json(&["-i", &fixture("request_monday.json")]);

    assert_eq!(
        valid,
        vec!["2026-03-16T09:45:00+00:00", "2026-03-16T16:30:00+00:00"]
    );
}

#[test]
fn resolve_text_format_uses_local_time() {
    slots()
        .args([
            "resolve",
            "-i",
            &fixture("request_monday.json"),
            "--format",
            "text",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 slot(s) of 30 mins in UTC"))
        .stdout(predicate::str::contains("2026-03-16 09:45-10:15 monday (+00:00)"))
        .stdout(predicate::str::contains("2026-03-16 16:30-17:00 monday (+00:00)"));
}

#[test]
fn resolve_generates_candidates_from_now_and_config() {
    let valid = resolve_json(&[
        "-i",
        &fixture("request_generated.json"),
        "--config",
        &fixture("policy_one_day.json"),
    ]);

    assert_eq!(
        valid,
        vec![
            "2026-03-16T09:00:00+00:00",
            "2026-03-16T09:15:00+00:00",
            "2026-03-16T09:30:00+00:00",
        ]
    );
}

#[test]
fn resolve_without_schedule_is_empty_not_error() {
    let valid = resolve_json(&["-i", &fixture("request_no_schedule.json")]);
    assert!(valid.is_empty());

    slots()
        .args([
            "resolve",
            "-i",
            &fixture("request_no_schedule.json"),
            "--format",
            "text",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No available slots"));
}

#[test]
fn resolve_writes_output_file() {
    let output_path = std::env::temp_dir().join("slots-test-resolve-output.json");
    let _ = std::fs::remove_file(&output_path);

    slots()
        .args([
            "resolve",
            "-i",
            &fixture("request_monday.json"),
            "-o",
            output_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    let valid: Vec<String> = serde_json::from_str(&content).unwrap();
    assert_eq!(valid.len(), 2);

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn resolve_rejects_non_positive_duration() {
    let input = r#"{"schedule": null, "duration_minutes": 0, "candidates": []}"#;

    slots()
        .arg("resolve")
        .write_stdin(input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid duration"));
}

#[test]
fn resolve_rejects_bad_config() {
    let config_path = std::env::temp_dir().join("slots-test-bad-policy.json");
    std::fs::write(&config_path, r#"{"slot_step_minutes": 0}"#).unwrap();

    slots()
        .args([
            "resolve",
            "-i",
            &fixture("request_monday.json"),
            "--config",
            config_path.to_str().unwrap(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load booking policy"));

    let _ = std::fs::remove_file(&config_path);
}

#[test]
fn resolve_missing_input_file() {
    slots()
        .args(["resolve", "-i", "/nonexistent/request.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Check subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_reports_busy_conflict() {
    slots()
        .args([
            "check",
            "-i",
            &fixture("request_monday.json"),
            "--start",
            "2026-03-16T09:00:00Z",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("unavailable: 2026-03-16T09:00:00+00:00"))
        .stdout(predicate::str::contains("15 min overlap"));
}

#[test]
fn check_reports_outside_availability() {
    slots()
        .args([
            "check",
            "-i",
            &fixture("request_monday.json"),
            "--start",
            "2026-03-16T16:45:00Z",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("unavailable"))
        .stdout(predicate::str::contains("outside availability"));
}

#[test]
fn check_reports_available_slot() {
    slots()
        .args([
            "check",
            "-i",
            &fixture("request_monday.json"),
            "--start",
            "2026-03-16T09:45:00Z",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("available: 2026-03-16T09:45:00+00:00"))
        .stdout(predicate::str::contains("conflicts").not());
}

#[test]
fn check_rejects_bad_start() {
    slots()
        .args([
            "check",
            "-i",
            &fixture("request_monday.json"),
            "--start",
            "monday morning",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --start datetime"));
}

#[test]
fn check_rejects_duration_over_default_cap() {
    slots()
        .args([
            "check",
            "-i",
            &fixture("request_too_long.json"),
            "--start",
            "2026-03-16T09:00:00Z",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid duration"))
        .stderr(predicate::str::contains("at most 720 minutes"));
}

#[test]
fn check_honours_config_like_resolve() {
    let args = |command: &'static str| {
        let mut cmd = slots();
        cmd.args([
            command,
            "-i",
            &fixture("request_monday.json"),
            "--config",
            &fixture("policy_short_meetings.json"),
        ]);
        cmd
    };

    args("resolve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at most 20 minutes"));
    args("check")
        .args(["--start", "2026-03-16T09:45:00Z"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at most 20 minutes"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Help
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    slots()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("check"));
}
