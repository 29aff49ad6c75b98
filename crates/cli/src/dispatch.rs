//! Command dispatch logic.
//!
//! Responsibilities:
//! - Route parsed CLI arguments to appropriate command handlers.
//!
//! Does NOT handle:
//! - CLI structure definitions (see `args` module).
//!
//! Invariants:
//! - Every handler returns the process exit code on success.

use anyhow::Result;

use crate::args::{Cli, Commands};
use crate::commands;

/// Dispatch CLI commands to their respective handlers.
pub(crate) fn run_command(cli: Cli) -> Result<i32> {
    let files = &cli.files;

    match cli.command {
        Commands::Check { output } => commands::check::run(files, &output),
        Commands::Read { output } => commands::read::run(files, &output),
        Commands::Get { key } => commands::get::run(files, &key),
        Commands::Set { key, value } => commands::set::run(files, &key, &value),
        Commands::Exec {
            override_existing,
            command,
        } => commands::exec::run(files, override_existing, &command),
    }
}
