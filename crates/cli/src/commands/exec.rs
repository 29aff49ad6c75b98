//! `exec`: run a child process with the resolved variables injected.
//!
//! Existing variables are preserved unless `--override` is given, matching the
//! library's `load` / `overload` semantics.

use std::path::PathBuf;
use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};
use envfile::{EnvLoader, InjectMode, ProcessEnv};

use crate::error::ExitCode;

pub fn run(files: &[PathBuf], override_existing: bool, command: &[String]) -> Result<i32> {
    let (program, args) = command
        .split_first()
        .context("No command given to exec")?;

    let mode = if override_existing {
        InjectMode::Override
    } else {
        InjectMode::Preserve
    };

    let pairs = EnvLoader::new()
        .with_files(files.iter().cloned())
        .with_mode(mode)
        .plan(&ProcessEnv)
        .context("Failed to resolve env files")?;

    tracing::debug!(program = %program, injected = pairs.len(), "Spawning child process");

    let status = Command::new(program)
        .args(args)
        .envs(pairs)
        .status()
        .with_context(|| format!("Failed to run '{}'", program))?;

    Ok(status_code(status))
}

#[cfg(unix)]
fn status_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    // Unix convention: terminated by signal N exits with 128 + N.
    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(ExitCode::GeneralError.as_i32())
}

#[cfg(not(unix))]
fn status_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(ExitCode::GeneralError.as_i32())
}
