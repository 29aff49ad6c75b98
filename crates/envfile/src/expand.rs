//! Variable expansion: resolves `$NAME` and `${NAME}` references inside values.
//!
//! Responsibilities:
//! - Substitute references with values from the mapping (transitively) or the ambient environment.
//! - Suppress direct self-references and bound longer cycles with a per-pass attempt counter.
//!
//! Does NOT handle:
//! - Parsing text into pairs (see `parser`).
//! - Writing resolved pairs anywhere (see `loader` and `marshal`).
//!
//! Invariants:
//! - A value without references is returned untouched.
//! - Ambient values are substituted verbatim and never expanded themselves.
//! - Unknown references resolve to the empty string.
//! - The attempt counter lives for exactly one pass; nothing leaks between calls.
//! - A failed pass leaves the mapping unmodified.

use std::collections::HashMap;
use std::ops::Range;

use crate::EnvMap;
use crate::constants::MAX_RESOLUTION_ATTEMPTS;
use crate::error::{EnvError, Result};
use crate::parser::is_key_byte;

/// Source of variables that are not defined in the parsed mapping.
pub trait AmbientEnv {
    /// Returns the value of `name`, or `None` if it is not set.
    fn lookup(&self, name: &str) -> Option<String>;
}

/// The environment of the current process.
///
/// Variables that are set but not valid Unicode are reported lossily, so that
/// their presence is never mistaken for absence.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl AmbientEnv for ProcessEnv {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|v| v.to_string_lossy().into_owned())
    }
}

impl AmbientEnv for EnvMap {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Expand every value of `env` in place, falling back to the process environment.
pub fn expand(env: &mut EnvMap) -> Result<()> {
    expand_with(env, &ProcessEnv)
}

/// Expand every value of `env` in place, falling back to `ambient`.
pub fn expand_with<A: AmbientEnv + ?Sized>(env: &mut EnvMap, ambient: &A) -> Result<()> {
    let resolved = {
        let source: &EnvMap = env;
        let mut pass = ExpansionPass::new(source, ambient);
        let mut resolved = Vec::with_capacity(source.len());
        for (key, value) in source {
            match pass.resolve(key, value) {
                Ok(value) => resolved.push((key.clone(), value)),
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Expansion aborted");
                    return Err(e);
                }
            }
        }
        resolved
    };

    tracing::debug!(keys = resolved.len(), "Expanded env values");
    env.extend(resolved);
    Ok(())
}

/// Returns true if `value` contains at least one reference token.
pub fn has_references(value: &str) -> bool {
    next_reference(value).is_some()
}

/// State shared by every key resolved during one call to [`expand_with`].
struct ExpansionPass<'a, A: ?Sized> {
    env: &'a EnvMap,
    ambient: &'a A,
    attempts: HashMap<(String, String), usize>,
    resolved: HashMap<String, String>,
}

impl<'a, A: AmbientEnv + ?Sized> ExpansionPass<'a, A> {
    fn new(env: &'a EnvMap, ambient: &'a A) -> Self {
        Self {
            env,
            ambient,
            attempts: HashMap::new(),
            resolved: HashMap::new(),
        }
    }

    fn resolve(&mut self, key: &'a str, value: &'a str) -> Result<String> {
        if let Some(done) = self.resolved.get(key) {
            return Ok(done.clone());
        }
        let value = self.evaluate(key, value)?;
        self.resolved.insert(key.to_string(), value.clone());
        Ok(value)
    }

    // Referenced keys are resolved depth-first. Suspended frames live on the heap so a
    // long cycle reaches the attempt ceiling without exhausting the thread stack.
    fn evaluate(&mut self, key: &'a str, value: &'a str) -> Result<String> {
        if !has_references(value) {
            return Ok(value.to_string());
        }

        let env = self.env;
        let mut parents: Vec<Frame<'a>> = Vec::new();
        let mut current = Frame::new(key, value);

        loop {
            match next_reference(current.rest) {
                Some(token) => {
                    current.out.push_str(&current.rest[..token.start]);
                    let name: &'a str = &current.rest[token.name];
                    current.rest = &current.rest[token.end..];

                    if name == current.key {
                        continue;
                    }
                    self.throttle(current.key, name)?;

                    if let Some(done) = self.resolved.get(name) {
                        current.out.push_str(done);
                    } else if let Some(raw) = env.get(name) {
                        parents.push(std::mem::replace(&mut current, Frame::new(name, raw)));
                    } else if let Some(ambient) = self.ambient.lookup(name) {
                        current.out.push_str(&ambient);
                    }
                }
                None => {
                    current.out.push_str(current.rest);
                    let Frame { key, out, .. } = current;

                    match parents.pop() {
                        Some(mut parent) => {
                            parent.out.push_str(&out);
                            self.resolved.insert(key.to_string(), out);
                            current = parent;
                        }
                        None => return Ok(out),
                    }
                }
            }
        }
    }

    fn throttle(&mut self, key: &str, reference: &str) -> Result<()> {
        let calls = self
            .attempts
            .entry((key.to_string(), reference.to_string()))
            .or_insert(0);
        *calls += 1;

        if *calls > MAX_RESOLUTION_ATTEMPTS {
            return Err(EnvError::RecursionDetected {
                key: key.to_string(),
                reference: reference.to_string(),
            });
        }
        Ok(())
    }
}

/// A value being expanded: the unscanned remainder and the output so far.
struct Frame<'a> {
    key: &'a str,
    rest: &'a str,
    out: String,
}

impl<'a> Frame<'a> {
    fn new(key: &'a str, value: &'a str) -> Self {
        Self {
            key,
            rest: value,
            out: String::with_capacity(value.len()),
        }
    }
}

/// Byte offsets of one reference token inside a value.
#[derive(Debug, PartialEq, Eq)]
struct Reference {
    start: usize,
    name: Range<usize>,
    end: usize,
}

/// Finds the first `$NAME`, `${NAME}` or `${NAME` token. A `$` not followed by a
/// name (after an optional `{`) is literal text.
fn next_reference(s: &str) -> Option<Reference> {
    let bytes = s.as_bytes();
    let mut from = 0;

    while let Some(offset) = s[from..].find('$') {
        let start = from + offset;
        let after = start + 1;

        if bytes.get(after) == Some(&b'{') {
            let name_start = after + 1;
            let name_end = scan_name(bytes, name_start);
            if name_end > name_start {
                // The closing brace is optional; only a braced name consumes it.
                let closed = bytes.get(name_end) == Some(&b'}');
                return Some(Reference {
                    start,
                    name: name_start..name_end,
                    end: name_end + usize::from(closed),
                });
            }
        } else {
            let name_end = scan_name(bytes, after);
            if name_end > after {
                return Some(Reference {
                    start,
                    name: after..name_end,
                    end: name_end,
                });
            }
        }

        from = after;
    }

    None
}

fn scan_name(bytes: &[u8], from: usize) -> usize {
    let len = bytes[from.min(bytes.len())..]
        .iter()
        .take_while(|b| is_key_byte(**b))
        .count();
    from + len
}
