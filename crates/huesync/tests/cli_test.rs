//! Integration tests for the `huesync` CLI binary.
//!
//! These tests validate argument parsing, help output, and the
//! registry-only commands — all without requiring a live bridge.
#![allow(clippy::unwrap_used)]

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `huesync` binary with env isolation.
///
/// Clears all `HUESYNC_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real registry.
fn huesync_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("huesync");
    cmd.env("HOME", "/tmp/huesync-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/huesync-cli-test-nonexistent")
        .env_remove("HUESYNC_REGISTRY")
        .env_remove("HUESYNC_APP_NAME")
        .env_remove("HUESYNC_DEVICE_NAME")
        .env_remove("HUESYNC_OUTPUT")
        .env_remove("HUESYNC_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = huesync_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(
        text.contains("Usage"),
        "Expected 'Usage' in output:\n{text}"
    );
}

#[test]
fn test_help_flag() {
    huesync_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("pairing")
            .and(predicate::str::contains("sync"))
            .and(predicate::str::contains("list"))
            .and(predicate::str::contains("path")),
    );
}

#[test]
fn test_version_flag() {
    huesync_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("huesync"));
}

#[test]
fn test_unknown_flag_is_a_usage_error() {
    let output = huesync_cmd().args(["list", "--bogus"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── path ────────────────────────────────────────────────────────────

#[test]
fn test_path_prints_registry_override() {
    huesync_cmd()
        .args(["--registry", "/tmp/somewhere/bridges.json", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/somewhere/bridges.json"));
}

#[test]
fn test_path_honors_env_var() {
    huesync_cmd()
        .env("HUESYNC_REGISTRY", "/tmp/env-registry.json")
        .arg("path")
        .assert()
        .success()
        .stdout(predicate::str::contains("/tmp/env-registry.json"));
}

// ── list ────────────────────────────────────────────────────────────

#[test]
fn test_list_missing_registry_is_empty_success() {
    let dir = tempfile::tempdir().unwrap();
    huesync_cmd()
        .args(["--registry"])
        .arg(dir.path().join("absent.json"))
        .arg("list")
        .assert()
        .success();
}

#[test]
fn test_list_shows_serials_from_registry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bridges.json");
    fs::write(
        &path,
        r#"{
            "001788FFFE23A581": {
                "ipaddress": "http://10.0.0.5/",
                "whitelist": { "userX": { "name": "myapp#myhost" } }
            }
        }"#,
    )
    .unwrap();

    huesync_cmd()
        .args(["--registry"])
        .arg(&path)
        .args(["--output", "plain", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("001788FFFE23A581"));
}

#[test]
fn test_list_json_output_is_parseable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bridges.json");
    fs::write(
        &path,
        r#"{ "AB12": { "ipaddress": null, "whitelist": {} } }"#,
    )
    .unwrap();

    let output = huesync_cmd()
        .args(["--registry"])
        .arg(&path)
        .args(["--output", "json", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(rows[0]["serial"], "AB12");
    assert_eq!(rows[0]["status"], "unpaired");
}

#[test]
fn test_list_corrupt_registry_exits_with_registry_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bridges.json");
    fs::write(&path, "{ not json").unwrap();

    let output = huesync_cmd()
        .args(["--registry"])
        .arg(&path)
        .arg("list")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let text = combined_output(&output);
    assert!(text.contains("corrupt"), "Expected 'corrupt' in:\n{text}");
}

#[test]
fn test_quiet_suppresses_list_output() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bridges.json");
    fs::write(
        &path,
        r#"{ "AB12": { "ipaddress": null, "whitelist": {} } }"#,
    )
    .unwrap();

    huesync_cmd()
        .args(["--registry"])
        .arg(&path)
        .args(["--quiet", "list"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
