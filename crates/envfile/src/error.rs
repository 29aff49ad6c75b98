//! Error types for env file parsing, expansion and persistence.
//!
//! Responsibilities:
//! - Define error variants for every failure of the parse → expand → side effect pipeline.
//! - Attach enough context (line number, key, path) to locate the problem.
//!
//! Does NOT handle:
//! - Mapping errors to process exit codes (see the CLI crate).
//!
//! Invariants:
//! - Errors NEVER include raw line contents or values; env files routinely hold secrets.
//! - Parse errors raised while reading a file are wrapped in `InFile` with the path.

use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, parsing, expanding or writing env files.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    /// The requested source file does not exist.
    #[error("Env file not found: {}", path.display())]
    SourceNotFound { path: PathBuf },

    /// The source file exists but could not be read.
    #[error("Failed to read env file {}: {kind}", path.display())]
    SourceRead { path: PathBuf, kind: ErrorKind },

    /// The current working directory could not be resolved for the default `.env` lookup.
    #[error("Unable to determine current directory: {kind}")]
    CurrentDir { kind: ErrorKind },

    /// A non-blank, non-comment line has no `=` separator.
    #[error("Invalid syntax at line {line}: expected KEY=VALUE")]
    InvalidSyntax { line: usize },

    /// A key contains characters outside `[A-Za-z0-9_]` or is empty.
    #[error("Invalid key '{key}' at line {line}: only letters, digits and '_' are allowed")]
    InvalidKey { line: usize, key: String },

    /// A value is empty or badly quoted.
    ///
    /// SAFETY: only the key is reported, never the value itself.
    #[error("Invalid value for {key} at line {line}: {reason}")]
    InvalidValue {
        line: usize,
        key: String,
        reason: String,
    },

    /// A parse error raised while reading a particular file.
    #[error("{} ({})", source, path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<EnvError>,
    },

    /// A chain of references did not terminate within the attempt ceiling.
    #[error("Recursion detected: {key} keeps resolving {reference}")]
    RecursionDetected { key: String, reference: String },

    /// A pair cannot be serialized so that it parses back to the same value.
    #[error("Cannot serialize {key}: {reason}")]
    InvalidEntry { key: String, reason: String },

    /// Writing an env file failed.
    #[error("Failed to write env file {}: {kind}", path.display())]
    Write { path: PathBuf, kind: ErrorKind },

    /// A pair cannot be injected into the process environment.
    #[error("Cannot set environment variable {key}: name or value is not representable")]
    EnvInject { key: String },
}

impl EnvError {
    /// Returns the innermost error, unwrapping any file context.
    pub fn root(&self) -> &EnvError {
        match self {
            EnvError::InFile { source, .. } => source.root(),
            other => other,
        }
    }

    /// Returns true for errors caused by malformed input text or entries.
    pub fn is_validation(&self) -> bool {
        matches!(
            self.root(),
            EnvError::InvalidSyntax { .. }
                | EnvError::InvalidKey { .. }
                | EnvError::InvalidValue { .. }
                | EnvError::InvalidEntry { .. }
        )
    }

    pub(crate) fn in_file(self, path: impl Into<PathBuf>) -> Self {
        EnvError::InFile {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

/// Convenience alias used across the crate.
pub type Result<T, E = EnvError> = std::result::Result<T, E>;
