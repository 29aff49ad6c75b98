//! `get`: print the resolved value of one variable.

use std::path::PathBuf;

use anyhow::Result;

use crate::error::{ExitCode, KeyNotFound};

pub fn run(files: &[PathBuf], key: &str) -> Result<i32> {
    let env = super::resolve(files)?;
    let value = env.get(key).ok_or_else(|| KeyNotFound(key.to_string()))?;

    println!("{value}");
    Ok(ExitCode::Success.as_i32())
}
