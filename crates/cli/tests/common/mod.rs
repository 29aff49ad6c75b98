//! Shared test utilities for envfile CLI integration tests.
//!
//! Responsibilities:
//! - Provide a hermetic CLI command factory rooted in a temporary directory.
//!
//! Invariants / Assumptions:
//! - Commands run with the temp dir as cwd, so the default `./.env` is test-owned.
//! - `ENVFILE_OUTPUT` is cleared so host settings never change output formats.

use assert_cmd::Command;
use std::path::Path;

/// Returns a hermetic `envfile` command running inside `dir`.
pub fn envfile_cmd(dir: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("envfile");
    cmd.current_dir(dir);
    cmd.env_remove("ENVFILE_OUTPUT").env_remove("RUST_LOG");
    cmd
}
