//! `check`: validate and expand env files without printing values.

use std::path::PathBuf;

use anyhow::Result;

use crate::error::ExitCode;
use crate::formatters::{CheckReport, OutputFormat, format_check};

pub fn run(files: &[PathBuf], output: &str) -> Result<i32> {
    let format = OutputFormat::parse(output, &[OutputFormat::Text, OutputFormat::Json])?;
    let env = super::resolve(files)?;

    let report = CheckReport {
        files: super::describe_files(files)?,
        keys: env.len(),
    };
    print!("{}", format_check(&report, format)?);
    Ok(ExitCode::Success.as_i32())
}
