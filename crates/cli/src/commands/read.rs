//! `read`: print the resolved variables.

use std::path::PathBuf;

use anyhow::Result;

use crate::error::ExitCode;
use crate::formatters::{OutputFormat, format_env};

pub fn run(files: &[PathBuf], output: &str) -> Result<i32> {
    let format = OutputFormat::parse(output, &[OutputFormat::Dotenv, OutputFormat::Json])?;
    let env = super::resolve(files)?;

    print!("{}", format_env(&env, format)?);
    Ok(ExitCode::Success.as_i32())
}
