//! envfile - Command-line front end for env file parsing and expansion.
//!
//! Responsibilities:
//! - Parse command-line arguments.
//! - Initialize logging to stderr.
//! - Run the selected command and translate failures into structured exit codes.
//!
//! Does NOT handle:
//! - Parsing or expansion logic (see `crates/envfile`).
//!
//! Invariants:
//! - Results go to stdout; logs and error messages go to stderr.
//! - `exec` exits with the child's status code.

mod args;
mod commands;
mod dispatch;
mod error;
mod formatters;

use args::Cli;
use clap::Parser;
use dispatch::run_command;
use error::ExitCodeExt;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let exit_code = match run_command(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{:#}", e);
            e.exit_code().as_i32()
        }
    };

    std::process::exit(exit_code);
}
