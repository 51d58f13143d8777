//! Integration tests for the `wgdash` binary.
//!
//! These tests validate argument parsing, help output, and startup
//! error handling -- all without a live wghttp backend and without
//! entering the TUI.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `wgdash` binary with env isolation.
///
/// Clears all `WGDASH_*` env vars and points config lookups at a
/// nonexistent path so tests never read the user's real configuration.
fn wgdash_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("wgdash");
    cmd.env("HOME", "/tmp/wgdash-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/wgdash-test-nonexistent")
        .env_remove("WGDASH_URL")
        .env_remove("WGDASH_SERVER__URL")
        .env_remove("WGDASH_SERVER__TIMEOUT_SECS")
        .env_remove("WGDASH_UI__POLL_INTERVAL_MS")
        .env_remove("WGDASH_UI__CEILING_GB")
        .env_remove("WGDASH_UI__DOWNLOAD_DIR")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible
/// matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    wgdash_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("WireGuard")
            .and(predicate::str::contains("--url"))
            .and(predicate::str::contains("--ceiling-gb"))
            .and(predicate::str::contains("--log-file")),
    );
}

#[test]
fn test_version_flag() {
    wgdash_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wgdash"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_unknown_flag_is_rejected() {
    let output = wgdash_cmd()
        .arg("--definitely-not-a-flag")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected clap usage error");
    let text = combined_output(&output);
    assert!(
        text.contains("unexpected argument") || text.contains("definitely-not-a-flag"),
        "Expected error about the unknown flag:\n{text}"
    );
}

#[test]
fn test_non_numeric_ceiling_is_rejected() {
    let output = wgdash_cmd()
        .args(["--ceiling-gb", "lots"])
        .output()
        .unwrap();
    assert!(!output.status.success(), "Expected failure for bad ceiling");
    let text = combined_output(&output);
    assert!(
        text.contains("invalid value") || text.contains("lots"),
        "Expected parse error for the ceiling flag:\n{text}"
    );
}

#[test]
fn test_invalid_url_fails_before_entering_the_tui() {
    let tmp = tempfile::tempdir().unwrap();
    wgdash_cmd()
        .args(["--url", "not a url"])
        .arg("--log-file")
        .arg(tmp.path().join("wgdash.log"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("server.url"));
}

#[test]
fn test_nonpositive_ceiling_fails_at_startup() {
    let tmp = tempfile::tempdir().unwrap();
    wgdash_cmd()
        .args(["--ceiling-gb", "0"])
        .arg("--log-file")
        .arg(tmp.path().join("wgdash.log"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("ceiling"));
}
