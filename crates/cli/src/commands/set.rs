//! `set`: append a variable to an env file.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::error::ExitCode;

/// Appends to the last env file, the one whose values win the merge.
pub fn run(files: &[PathBuf], key: &str, value: &str) -> Result<i32> {
    let target = match files.last() {
        Some(last) => {
            if files.len() > 1 {
                tracing::debug!(
                    path = %last.display(),
                    "Several env files given; appending to the last"
                );
            }
            last.clone()
        }
        None => envfile::default_env_path()?,
    };

    envfile::append(key, value, &target)
        .with_context(|| format!("Failed to set {} in {}", key, target.display()))?;

    tracing::info!(key = %key, path = %target.display(), "Variable appended");
    Ok(ExitCode::Success.as_i32())
}
