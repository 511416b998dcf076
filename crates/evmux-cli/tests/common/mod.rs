//! Shared E2E test helpers for `evmux` binary tests.

use assert_cmd::cargo::cargo_bin_cmd;
use std::time::Duration;

/// Default timeout for CLI tests.
pub const TIMEOUT_BASIC: Duration = Duration::from_secs(10);

/// Variables that would leak the caller's settings into a test run.
const EVMUX_VARS: &[&str] = &[
    "EVMUX_DEBUG",
    "EVMUX_RECORD_INPUT_FILE",
    "EVMUX_RECORD_OUTPUT_FILE",
    "EVMUX_DELETE_RECORDINGS_ON_ABORT",
];

/// Build a Command for the `evmux` binary, isolated from global config
/// and `EVMUX_*` variables.
pub fn evmux_cmd() -> assert_cmd::Command {
    let mut cmd: assert_cmd::Command = cargo_bin_cmd!("evmux");
    cmd.timeout(TIMEOUT_BASIC);
    for var in EVMUX_VARS {
        cmd.env_remove(var);
    }
    cmd.arg("--no-global-config");
    cmd
}
