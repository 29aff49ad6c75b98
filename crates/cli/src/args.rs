//! CLI argument definitions and parsing.
//!
//! Responsibilities:
//! - Define the CLI structure using clap derive macros.
//!
//! Non-responsibilities:
//! - Does not execute commands (see `dispatch` module).

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "envfile")]
#[command(about = "Parse, expand and apply KEY=VALUE env files", long_about = None)]
#[command(version)]
#[command(
    after_help = "Examples:\n  envfile check\n  envfile -f base.env -f local.env read -o json\n  envfile get DATABASE_URL\n  envfile set API_URL https://example.com\n  envfile exec -- ./server --port 8080\n"
)]
pub struct Cli {
    /// Env file to read; repeat to merge several (later files win). Defaults to ./.env
    #[arg(short, long = "file", global = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate and expand the env files without printing values
    Check {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        output: String,
    },

    /// Print the resolved variables
    Read {
        /// Output format (dotenv, json)
        #[arg(short, long, default_value = "dotenv", env = "ENVFILE_OUTPUT")]
        output: String,
    },

    /// Print the resolved value of a single variable
    Get {
        /// Variable name
        key: String,
    },

    /// Append KEY=VALUE to the last env file (created if missing)
    Set {
        /// Variable name
        key: String,

        /// Value to store
        value: String,
    },

    /// Run a command with the resolved variables in its environment
    Exec {
        /// Override variables that are already set in the environment
        #[arg(long = "override")]
        override_existing: bool,

        /// Command and arguments to run
        #[arg(
            required = true,
            trailing_var_arg = true,
            allow_hyphen_values = true,
            value_name = "COMMAND"
        )]
        command: Vec<String>,
    },
}
