//! Env file loading with variable expansion.
//!
//! This crate parses line-oriented `KEY=VALUE` files, resolves `$VAR` and
//! `${VAR}` references (against the file itself and the process environment),
//! and hands the result back as a map or injects it into the process environment.
//!
//! ```no_run
//! let env = envfile::EnvLoader::new().with_file("config/app.env").read()?;
//! println!("{}", env["DATABASE_URL"]);
//! # Ok::<(), envfile::EnvError>(())
//! ```

pub mod constants;
mod error;
mod expand;
mod loader;
mod marshal;
mod parser;
mod source;

use std::collections::BTreeMap;

/// Mapping from key to value; ordered so that serialization is deterministic.
pub type EnvMap = BTreeMap<String, String>;

pub use error::{EnvError, Result};
pub use expand::{AmbientEnv, ProcessEnv, expand, expand_with, has_references};
pub use loader::{EnvLoader, InjectMode, injection_plan, load, overload, read, unmarshal};
pub use marshal::{append, marshal, marshal_entry, write};
pub use parser::{is_valid_key, parse};
pub use source::{default_env_path, parse_file, parse_files, parse_or_default, read_source};
