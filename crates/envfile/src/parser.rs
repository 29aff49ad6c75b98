//! Pair extraction: raw env file text to a validated key/value mapping.
//!
//! Responsibilities:
//! - Classify lines as blank, comment or candidate pair.
//! - Validate keys and values and strip inline comments and optional quotes.
//!
//! Does NOT handle:
//! - Reading files (see `source`).
//! - Resolving `$VAR` references (see `expand`).
//!
//! Invariants:
//! - Parsing stops at the first offending line; no partial mapping is returned.
//! - Duplicate keys: the last occurrence wins.
//! - A `#` always starts a comment, even inside quotes.

use crate::EnvMap;
use crate::constants::{COMMENT_CHAR, QUOTE_CHAR, SEPARATOR_CHAR};
use crate::error::{EnvError, Result};

/// Parse env file text into a mapping of keys to (unexpanded) values.
pub fn parse(text: &str) -> Result<EnvMap> {
    let mut pairs = EnvMap::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if is_skippable(line) {
            continue;
        }

        let (key, value) = parse_line(line, index + 1)?;
        pairs.insert(key, value);
    }

    tracing::trace!(keys = pairs.len(), "Parsed env text");
    Ok(pairs)
}

/// Returns true if `key` is non-empty and made only of ASCII letters, digits and `_`.
///
/// A leading digit is accepted.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(is_key_byte)
}

pub(crate) fn is_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_skippable(line: &str) -> bool {
    line.is_empty() || line.starts_with(COMMENT_CHAR)
}

fn parse_line(line: &str, line_no: usize) -> Result<(String, String)> {
    let (raw_key, raw_value) = line
        .split_once(SEPARATOR_CHAR)
        .ok_or(EnvError::InvalidSyntax { line: line_no })?;

    let key = raw_key.trim();
    if !is_valid_key(key) {
        return Err(EnvError::InvalidKey {
            line: line_no,
            key: key.to_string(),
        });
    }

    let value = parse_value(raw_value).map_err(|reason| EnvError::InvalidValue {
        line: line_no,
        key: key.to_string(),
        reason: reason.to_string(),
    })?;

    Ok((key.to_string(), value.to_string()))
}

fn parse_value(raw: &str) -> std::result::Result<&str, &'static str> {
    let uncommented = match raw.find(COMMENT_CHAR) {
        Some(pos) => &raw[..pos],
        None => raw,
    };

    let value = uncommented.trim();
    if value.is_empty() {
        return Err("value is empty");
    }

    if value.starts_with(QUOTE_CHAR) {
        return unquote(value).ok_or("quoted value must be a single non-empty \"...\" string");
    }

    Ok(value)
}

/// Matches `^"[^"]+"$` and returns the content between the quotes.
fn unquote(value: &str) -> Option<&str> {
    let inner = value.strip_prefix(QUOTE_CHAR)?.strip_suffix(QUOTE_CHAR)?;
    if inner.is_empty() || inner.contains(QUOTE_CHAR) {
        return None;
    }
    Some(inner)
}
