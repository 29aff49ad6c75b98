//! Output formatters for CLI commands.
//!
//! Provides the dotenv and JSON renderings of resolved variables, and the
//! text and JSON renderings of a `check` report.

use anyhow::{Context, Result};
use envfile::EnvMap;
use serde::Serialize;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Dotenv,
    Json,
    Text,
}

impl OutputFormat {
    /// Parse from string, accepting only the formats listed in `allowed`.
    pub fn parse(s: &str, allowed: &[OutputFormat]) -> Result<Self> {
        let format = match s.to_lowercase().as_str() {
            "dotenv" | "env" => Some(OutputFormat::Dotenv),
            "json" => Some(OutputFormat::Json),
            "text" => Some(OutputFormat::Text),
            _ => None,
        };

        match format {
            Some(format) if allowed.contains(&format) => Ok(format),
            _ => {
                let valid: Vec<&str> = allowed.iter().map(|f| f.name()).collect();
                anyhow::bail!(
                    "Invalid output format: {}. Valid options: {}",
                    s,
                    valid.join(", ")
                )
            }
        }
    }

    fn name(self) -> &'static str {
        match self {
            OutputFormat::Dotenv => "dotenv",
            OutputFormat::Json => "json",
            OutputFormat::Text => "text",
        }
    }
}

/// Result of validating a set of env files.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub files: Vec<String>,
    pub keys: usize,
}

/// Render resolved variables.
pub fn format_env(env: &EnvMap, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(env)?)),
        _ => envfile::marshal(env)
            .context("Resolved values cannot be written as an env file; use --output json"),
    }
}

/// Render a check report.
pub fn format_check(report: &CheckReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(report)?)),
        _ => Ok(format!(
            "OK: {} variable(s) resolved from {}\n",
            report.keys,
            report.files.join(", ")
        )),
    }
}
