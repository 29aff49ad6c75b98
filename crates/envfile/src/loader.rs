//! Orchestration: parse → expand → hand the result to the caller or the process.
//!
//! Responsibilities:
//! - Provide a builder-pattern `EnvLoader` over one or more env files.
//! - Provide the `read`, `unmarshal`, `load` and `overload` entry points.
//! - Decide which pairs are injected into the process environment.
//!
//! Does NOT handle:
//! - Line grammar (see `parser`) or reference resolution (see `expand`).
//! - Writing env files (see `marshal`).
//!
//! Invariants / Assumptions:
//! - With no files configured, `./.env` in the current working directory is used.
//! - `InjectMode::Preserve` never overrides a variable that is already set, even to "".
//! - Nothing is injected unless parsing and expansion both succeed.
//! - Process environment mutation is process-global; callers serialize concurrent use.

use std::path::{Path, PathBuf};

use crate::EnvMap;
use crate::error::{EnvError, Result};
use crate::expand::{AmbientEnv, ProcessEnv, expand, expand_with};
use crate::parser::{is_valid_key, parse};
use crate::source::parse_or_default;

/// How resolved pairs interact with variables already present in the environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InjectMode {
    /// Keep existing variables; only set the ones that are missing.
    #[default]
    Preserve,
    /// Set every resolved pair, replacing existing values.
    Override,
}

/// Builder for loading env files.
#[derive(Debug, Clone, Default)]
pub struct EnvLoader {
    files: Vec<PathBuf>,
    mode: InjectMode,
}

impl EnvLoader {
    /// Creates a loader that reads `./.env` and preserves existing variables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file. Files are merged in the order they are added; later files win.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Adds several files in order.
    pub fn with_files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn with_mode(mut self, mode: InjectMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn mode(&self) -> InjectMode {
        self.mode
    }

    /// Parses and expands the configured files against the process environment.
    pub fn read(&self) -> Result<EnvMap> {
        self.read_with(&ProcessEnv)
    }

    /// Parses and expands the configured files against `ambient`.
    pub fn read_with<A: AmbientEnv + ?Sized>(&self, ambient: &A) -> Result<EnvMap> {
        let mut env = parse_or_default(self.files.as_slice())?;
        expand_with(&mut env, ambient)?;

        tracing::debug!(
            files = self.files.len(),
            keys = env.len(),
            "Env files resolved"
        );
        Ok(env)
    }

    /// Returns the pairs `load` would set, given `ambient` as the current environment.
    pub fn plan<A: AmbientEnv + ?Sized>(&self, ambient: &A) -> Result<Vec<(String, String)>> {
        let env = self.read_with(ambient)?;
        Ok(injection_plan(env, self.mode, ambient))
    }

    /// Resolves the configured files and sets the result in the process environment.
    ///
    /// Returns the number of variables that were set.
    pub fn load(&self) -> Result<usize> {
        let pairs = self.plan(&ProcessEnv)?;
        let count = pairs.len();
        inject(pairs)?;

        tracing::debug!(set = count, mode = ?self.mode, "Env loaded into process");
        Ok(count)
    }
}

/// Selects the pairs to set according to `mode`, skipping existing variables when preserving.
pub fn injection_plan<A: AmbientEnv + ?Sized>(
    env: EnvMap,
    mode: InjectMode,
    ambient: &A,
) -> Vec<(String, String)> {
    env.into_iter()
        .filter(|(key, _)| match mode {
            InjectMode::Override => true,
            InjectMode::Preserve => ambient.lookup(key).is_none(),
        })
        .collect()
}

fn inject(pairs: Vec<(String, String)>) -> Result<()> {
    // Validate everything first so a bad pair never leaves the environment half-updated.
    if let Some((key, _)) = pairs
        .iter()
        .find(|(key, value)| !is_valid_key(key) || value.contains('\0'))
    {
        return Err(EnvError::EnvInject { key: key.clone() });
    }

    for (key, value) in pairs {
        // SAFETY: keys are validated `[A-Za-z0-9_]+` and values are NUL-free. Callers
        // must not read or write the environment from other threads during `load`.
        unsafe { std::env::set_var(&key, &value) };
    }
    Ok(())
}

/// Parse and expand `paths` (or `./.env` when empty) and return the mapping.
pub fn read<P: AsRef<Path>>(paths: &[P]) -> Result<EnvMap> {
    let mut env = parse_or_default(paths)?;
    expand(&mut env)?;
    Ok(env)
}

/// Parse and expand env text.
pub fn unmarshal(text: &str) -> Result<EnvMap> {
    let mut env = parse(text)?;
    expand(&mut env)?;
    Ok(env)
}

/// Load `paths` (or `./.env`) into the process environment without overriding existing variables.
pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<()> {
    loader_for(paths).with_mode(InjectMode::Preserve).load()?;
    Ok(())
}

/// Like [`load`], but existing variables are overridden.
pub fn overload<P: AsRef<Path>>(paths: &[P]) -> Result<()> {
    loader_for(paths).with_mode(InjectMode::Override).load()?;
    Ok(())
}

fn loader_for<P: AsRef<Path>>(paths: &[P]) -> EnvLoader {
    EnvLoader::new().with_files(paths.iter().map(|p| p.as_ref().to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> EnvMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_builder_defaults() {
        let loader = EnvLoader::new();
        assert!(loader.files().is_empty());
        assert_eq!(loader.mode(), InjectMode::Preserve);
    }

    #[test]
    fn test_builder_keeps_file_order() {
        let loader = EnvLoader::new()
            .with_file("a.env")
            .with_files(["b.env", "c.env"]);
        let names: Vec<_> = loader.files().iter().map(|p| p.to_str().unwrap()).collect();
        assert_eq!(names, ["a.env", "b.env", "c.env"]);
    }

    #[test]
    fn test_read_with_expands_across_files() {
        let dir = TempDir::new().unwrap();
        let base = dir.path().join("base.env");
        let local = dir.path().join("local.env");
        fs::write(&base, "HOST=localhost\nURL=http://${HOST}:${PORT}\n").unwrap();
        fs::write(&local, "PORT=8080\nHOST=example.com\n").unwrap();

        let resolved = EnvLoader::new()
            .with_files([&base, &local])
            .read_with(&EnvMap::new())
            .unwrap();

        assert_eq!(resolved["URL"], "http://example.com:8080");
    }

    #[test]
    fn test_plan_preserve_skips_existing() {
        let planned = injection_plan(
            env(&[("A", "1"), ("B", "2")]),
            InjectMode::Preserve,
            &env(&[("A", "already")]),
        );
        assert_eq!(planned, vec![("B".to_string(), "2".to_string())]);
    }

    #[test]
    fn test_plan_preserve_treats_empty_as_set() {
        let planned = injection_plan(env(&[("A", "1")]), InjectMode::Preserve, &env(&[("A", "")]));
        assert!(planned.is_empty());
    }

    #[test]
    fn test_plan_override_sets_everything() {
        let planned = injection_plan(
            env(&[("A", "1"), ("B", "2")]),
            InjectMode::Override,
            &env(&[("A", "already")]),
        );
        assert_eq!(planned.len(), 2);
    }

    #[test]
    fn test_plan_reports_recursion() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "A=${B}\nB=${A}\n").unwrap();

        let err = EnvLoader::new()
            .with_file(&path)
            .plan(&EnvMap::new())
            .unwrap_err();
        assert!(matches!(err, EnvError::RecursionDetected { .. }));
    }

    #[test]
    fn test_inject_rejects_nul_before_setting_anything() {
        let err = inject(vec![
            ("ENVFILE_INJECT_OK".to_string(), "fine".to_string()),
            ("ENVFILE_INJECT_BAD".to_string(), "a\0b".to_string()),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            EnvError::EnvInject {
                key: "ENVFILE_INJECT_BAD".to_string()
            }
        );
        assert!(std::env::var_os("ENVFILE_INJECT_OK").is_none());
    }

    #[test]
    #[serial]
    fn test_load_preserves_and_overload_overrides() {
        let _lock = crate::test_util::global_test_lock().lock().unwrap();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "ENVFILE_UT_KEEP=file\nENVFILE_UT_NEW=fresh\n").unwrap();

        temp_env::with_vars(
            [
                ("ENVFILE_UT_KEEP", Some("process")),
                ("ENVFILE_UT_NEW", None),
            ],
            || {
                load(&[&path]).unwrap();
                assert_eq!(std::env::var("ENVFILE_UT_KEEP").unwrap(), "process");
                assert_eq!(std::env::var("ENVFILE_UT_NEW").unwrap(), "fresh");

                overload(&[&path]).unwrap();
                assert_eq!(std::env::var("ENVFILE_UT_KEEP").unwrap(), "file");
            },
        );
    }

    #[test]
    #[serial]
    fn test_failed_load_sets_nothing() {
        let _lock = crate::test_util::global_test_lock().lock().unwrap();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "ENVFILE_UT_PARTIAL=1\nA=${B}\nB=${A}\n").unwrap();

        temp_env::with_var_unset("ENVFILE_UT_PARTIAL", || {
            let err = load(&[&path]).unwrap_err();
            assert!(matches!(err, EnvError::RecursionDetected { .. }));
            assert!(std::env::var_os("ENVFILE_UT_PARTIAL").is_none());
        });
    }

    #[test]
    fn test_unmarshal_resolves_references() {
        let resolved = unmarshal("A=${B}\nB=1\nC=${C}\n").unwrap();
        assert_eq!(resolved["A"], "1");
        assert_eq!(resolved["C"], "");
    }

    #[test]
    fn test_unmarshal_reports_parse_errors() {
        let err = unmarshal("A=1\nB\n").unwrap_err();
        assert_eq!(err, EnvError::InvalidSyntax { line: 2 });
    }
}
