//! Centralized constants for the envfile workspace.
//!
//! This module contains default values used across crates to avoid
//! magic number duplication.

// =============================================================================
// Sources
// =============================================================================

/// File name looked up in the current working directory when no source is given.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Extension used for the temporary sibling written before an atomic rename.
pub const TEMP_FILE_EXTENSION: &str = "tmp";

// =============================================================================
// Expansion
// =============================================================================

/// Maximum number of resolution attempts for one (requesting key, referenced key)
/// pair within a single expansion pass. Exceeding it is reported as a cycle.
pub const MAX_RESOLUTION_ATTEMPTS: usize = 1000;

// =============================================================================
// Syntax
// =============================================================================

/// Starts a comment line or an inline comment.
pub const COMMENT_CHAR: char = '#';

/// Separates a key from its value. Only the first occurrence on a line counts.
pub const SEPARATOR_CHAR: char = '=';

/// The only quoting character understood around a whole value.
pub const QUOTE_CHAR: char = '"';
