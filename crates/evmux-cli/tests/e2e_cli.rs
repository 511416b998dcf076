//! E2E integration tests for the `evmux` binary.
//!
//! Logs go to stderr; command output goes to stdout.

mod common;

use common::evmux_cmd;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

// ─── demo ──────────────────────────────────────────────────────────

#[test]
fn demo_routes_by_prefix() {
    evmux_cmd()
        .args(["demo", "-n", "3"])
        .assert()
        .success()
        .stdout(contains("alpha: a.0 a.1 a.2"))
        .stdout(contains("beta: b.0 b.1 b.2"))
        .stdout(contains("delivered=6"));
}

#[test]
fn demo_debug_logs_to_stderr() {
    evmux_cmd()
        .args(["-d", "demo", "-n", "1"])
        .assert()
        .success()
        .stderr(contains("multiplexer stopped"))
        .stdout(contains("multiplexer stopped").not());
}

// ─── dump ──────────────────────────────────────────────────────────

#[test]
fn demo_recording_can_be_dumped() {
    let dir = tempfile::tempdir().expect("create temp dir for recordings");
    let dir_arg = dir.path().to_str().expect("valid utf8");

    evmux_cmd()
        .args(["demo", "-n", "2", "--record-dir", dir_arg])
        .assert()
        .success();

    let log = dir.path().join("beta-in.log");
    evmux_cmd()
        .args(["dump", log.to_str().expect("valid utf8")])
        .assert()
        .success()
        .stdout(contains(r#"b.0 [Data] {"n":0}"#))
        .stdout(contains(r#"b.1 [Data] {"n":1}"#));

    let log = dir.path().join("producer-out.log");
    evmux_cmd()
        .args(["dump", "--json", log.to_str().expect("valid utf8")])
        .assert()
        .success()
        .stdout(contains(r#""id":"c.1""#));
}

#[test]
fn env_output_log_is_split_per_channel() {
    let dir = tempfile::tempdir().expect("create temp dir for recordings");
    let base = dir.path().join("out.log");

    evmux_cmd()
        .env("EVMUX_RECORD_OUTPUT_FILE", base.to_str().expect("valid utf8"))
        .args(["demo", "-n", "2"])
        .assert()
        .success();

    let log = dir.path().join("out.producer.log");
    evmux_cmd()
        .args(["dump", log.to_str().expect("valid utf8")])
        .assert()
        .success()
        .stdout(contains("a.0 [Data]"))
        .stdout(contains("c.1 [Data]"));
    assert!(dir.path().join("out.alpha.log").exists());
    assert!(dir.path().join("out.beta.log").exists());
    assert!(!base.exists());
}

#[test]
fn dump_missing_log_fails() {
    evmux_cmd()
        .args(["dump", "/nonexistent/evmux.log"])
        .assert()
        .failure()
        .stderr(contains("cannot dump"));
}

// ─── config ────────────────────────────────────────────────────────

#[test]
fn config_prints_effective_toml() {
    let dir = tempfile::tempdir().expect("create temp dir for config");
    let path = dir.path().join("run.toml");
    std::fs::write(&path, "[channels.alpha]\nrecord-input-file = \"alpha.log\"\n")
        .expect("write config");

    evmux_cmd()
        .args(["config", "--config", path.to_str().expect("valid utf8")])
        .assert()
        .success()
        .stdout(contains("[channels.alpha]"))
        .stdout(contains("alpha.log"));
}

#[test]
fn config_env_override() {
    evmux_cmd()
        .env("EVMUX_DELETE_RECORDINGS_ON_ABORT", "no")
        .arg("config")
        .assert()
        .success()
        .stdout(contains("delete-recordings-on-abort = false"));
}

#[test]
fn config_invalid_env_fails() {
    evmux_cmd()
        .env("EVMUX_DEBUG", "maybe")
        .arg("config")
        .assert()
        .failure()
        .stderr(contains("EVMUX_DEBUG"));
}
