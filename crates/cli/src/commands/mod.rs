//! Command implementations for envfile.
//!
//! Each module exposes a `run` function that returns the process exit code.

pub mod check;
pub mod exec;
pub mod get;
pub mod read;
pub mod set;

use std::path::PathBuf;

use anyhow::{Context, Result};
use envfile::{EnvLoader, EnvMap};

/// Parse and expand `files` (or `./.env`) against the process environment.
pub(crate) fn resolve(files: &[PathBuf]) -> Result<EnvMap> {
    EnvLoader::new()
        .with_files(files.iter().cloned())
        .read()
        .context("Failed to resolve env files")
}

/// Human-readable names of the files a command operates on.
pub(crate) fn describe_files(files: &[PathBuf]) -> Result<Vec<String>> {
    if files.is_empty() {
        let default = envfile::default_env_path()?;
        return Ok(vec![default.display().to_string()]);
    }
    Ok(files.iter().map(|f| f.display().to_string()).collect())
}
