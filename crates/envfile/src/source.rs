//! File sources for env files.
//!
//! Responsibilities:
//! - Read env files from disk and report missing files distinctly.
//! - Resolve the default `.env` in the current working directory.
//! - Parse several files and merge them in caller order.
//!
//! Does NOT handle:
//! - Expansion of references (see `expand`).
//! - Writing files (see `marshal`).
//!
//! Invariants:
//! - Later files overwrite earlier ones key by key.
//! - Any failing file aborts the whole merge.
//! - Parse errors are wrapped with the path of the offending file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::EnvMap;
use crate::constants::DEFAULT_ENV_FILE;
use crate::error::{EnvError, Result};
use crate::parser::parse;

/// Returns `<current working directory>/.env`.
pub fn default_env_path() -> Result<PathBuf> {
    let cwd = std::env::current_dir().map_err(|e| EnvError::CurrentDir { kind: e.kind() })?;
    Ok(cwd.join(DEFAULT_ENV_FILE))
}

/// Read the full contents of an env file.
pub fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => EnvError::SourceNotFound {
            path: path.to_path_buf(),
        },
        kind => EnvError::SourceRead {
            path: path.to_path_buf(),
            kind,
        },
    })
}

/// Read and parse a single env file.
pub fn parse_file(path: &Path) -> Result<EnvMap> {
    let content = read_source(path)?;
    let env = parse(&content).map_err(|e| e.in_file(path))?;

    tracing::debug!(path = %path.display(), keys = env.len(), "Parsed env file");
    Ok(env)
}

/// Parse every file in order and merge them; later files win.
pub fn parse_files<P: AsRef<Path>>(paths: &[P]) -> Result<EnvMap> {
    let mut env = EnvMap::new();
    for path in paths {
        env.extend(parse_file(path.as_ref())?);
    }
    Ok(env)
}

/// Parse the given files, or the default `.env` when none are given.
pub fn parse_or_default<P: AsRef<Path>>(paths: &[P]) -> Result<EnvMap> {
    match paths {
        [] => parse_file(&default_env_path()?),
        [single] => parse_file(single.as_ref()),
        many => parse_files(many),
    }
}
