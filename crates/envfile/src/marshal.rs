//! Serialization of env mappings back to env file text.
//!
//! Responsibilities:
//! - Render a mapping as sorted `KEY=VALUE` lines.
//! - Write env files atomically and append single pairs to existing files.
//!
//! Does NOT handle:
//! - Parsing (see `parser`); output is validated so that it parses back unchanged.
//!
//! Invariants:
//! - `parse(&marshal(env)?)? == env` for every mapping `marshal` accepts.
//! - Values are quoted only when surrounding whitespace would otherwise be trimmed.
//! - Writes are atomic (temp file + rename).

use std::path::{Path, PathBuf};

use crate::EnvMap;
use crate::constants::{COMMENT_CHAR, QUOTE_CHAR, SEPARATOR_CHAR, TEMP_FILE_EXTENSION};
use crate::error::{EnvError, Result};
use crate::parser::{is_valid_key, parse};
use crate::source::read_source;

/// Render `env` as env file text, one line per pair, sorted by key.
pub fn marshal(env: &EnvMap) -> Result<String> {
    let mut out = String::new();
    for (key, value) in env {
        out.push_str(&marshal_entry(key, value)?);
    }
    Ok(out)
}

/// Render a single pair as a `KEY=VALUE\n` line.
pub fn marshal_entry(key: &str, value: &str) -> Result<String> {
    if !is_valid_key(key) {
        return Err(invalid(key, "only letters, digits and '_' are allowed in keys"));
    }
    let value = format_value(value).map_err(|reason| invalid(key, reason))?;
    Ok(format!("{key}{SEPARATOR_CHAR}{value}\n"))
}

/// Write `env` to `path`, replacing any existing file.
pub fn write(env: &EnvMap, path: &Path) -> Result<()> {
    let content = marshal(env)?;
    atomic_write(path, &content)?;

    tracing::debug!(path = %path.display(), keys = env.len(), "Env file written");
    Ok(())
}

/// Append `key=value` to the env file at `path`, creating it if missing.
///
/// The existing content must parse; its comments and layout are kept. Since the
/// last occurrence of a key wins, the appended line overrides earlier ones.
pub fn append(key: &str, value: &str, path: &Path) -> Result<()> {
    let line = marshal_entry(key, value)?;

    let mut content = match read_source(path) {
        Ok(content) => content,
        Err(EnvError::SourceNotFound { .. }) => String::new(),
        Err(e) => return Err(e),
    };
    parse(&content).map_err(|e| e.in_file(path))?;

    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content.push_str(&line);
    atomic_write(path, &content)?;

    tracing::debug!(path = %path.display(), key = %key, "Env entry appended");
    Ok(())
}

fn format_value(value: &str) -> std::result::Result<String, &'static str> {
    if value.is_empty() {
        return Err("value is empty");
    }
    if value.contains(['\n', '\r']) {
        return Err("multi-line values are not supported");
    }
    if value.contains(COMMENT_CHAR) {
        return Err("values containing '#' cannot be written");
    }

    let needs_quotes = value.trim() != value || value.starts_with(QUOTE_CHAR);
    if !needs_quotes {
        return Ok(value.to_string());
    }
    if value.contains(QUOTE_CHAR) {
        return Err("value needs quoting but contains '\"'");
    }
    Ok(format!("{QUOTE_CHAR}{value}{QUOTE_CHAR}"))
}

fn invalid(key: &str, reason: &str) -> EnvError {
    EnvError::InvalidEntry {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    match path.file_name() {
        Some(name) => {
            let mut name = name.to_os_string();
            name.push(".");
            name.push(TEMP_FILE_EXTENSION);
            path.with_file_name(name)
        }
        None => path.with_extension(TEMP_FILE_EXTENSION),
    }
}

fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let fail = |e: std::io::Error| EnvError::Write {
        path: path.to_path_buf(),
        kind: e.kind(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(fail)?;
    }

    // Write to a temporary sibling first so a failed write never truncates the target.
    let temp = temp_path(path);
    std::fs::write(&temp, content).map_err(fail)?;
    std::fs::rename(&temp, path).map_err(|e| {
        let _ = std::fs::remove_file(&temp);
        fail(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> EnvMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_marshal_sorted_lines() {
        let text = marshal(&env(&[("B", "2"), ("A", "1"), ("C", "x y")])).unwrap();
        assert_eq!(text, "A=1\nB=2\nC=x y\n");
    }

    #[test]
    fn test_marshal_empty_map() {
        assert_eq!(marshal(&EnvMap::new()).unwrap(), "");
    }

    #[test]
    fn test_marshal_quotes_surrounding_whitespace() {
        assert_eq!(marshal_entry("A", " padded ").unwrap(), "A=\" padded \"\n");
    }

    #[test]
    fn test_marshal_rejects_unrepresentable_values() {
        for value in ["", "a#b", "line1\nline2", "\"quoted\"", " \"x"] {
            let err = marshal_entry("A", value).unwrap_err();
            assert!(matches!(err, EnvError::InvalidEntry { .. }), "{value:?} gave {err:?}");
        }
    }

    #[test]
    fn test_marshal_rejects_invalid_key() {
        let err = marshal_entry("BAD-KEY", "v").unwrap_err();
        assert!(matches!(err, EnvError::InvalidEntry { key, .. } if key == "BAD-KEY"));
    }

    #[test]
    fn test_marshal_output_parses_back() {
        let original = env(&[
            ("URL", "postgres://u@h/db?x=1"),
            ("SPACED", "  keep me  "),
            ("INNER", "say \"hi\""),
            ("DOLLAR", "${NOT_EXPANDED_HERE}"),
        ]);
        let parsed = parse(&marshal(&original).unwrap()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_write_creates_parent_and_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("app.env");

        write(&env(&[("A", "1")]), &path).unwrap();
        write(&env(&[("B", "2")]), &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "B=2\n");
        assert!(!temp_path(&path).exists(), "temp file should be renamed away");
    }

    #[test]
    fn test_append_preserves_existing_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "# settings\nA=1 # inline").unwrap();

        append("B", "2", &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "# settings\nA=1 # inline\nB=2\n");
    }

    #[test]
    fn test_append_overrides_through_last_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "A=old\n").unwrap();

        append("A", "new", &path).unwrap();

        let parsed = parse(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["A"], "new");
    }

    #[test]
    fn test_append_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fresh.env");

        append("A", "1", &path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "A=1\n");
    }

    #[test]
    fn test_append_refuses_broken_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "no separator here\n").unwrap();

        let err = append("A", "1", &path).unwrap_err();
        assert!(err.is_validation(), "{err:?}");
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "no separator here\n",
            "file must be left untouched"
        );
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let path = Path::new("/etc/app/.env");
        assert_eq!(temp_path(path), Path::new("/etc/app/.env.tmp"));
    }
}
