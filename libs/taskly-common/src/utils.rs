//! Small utilities shared across the Taskly workspace

use crate::constants::DATABASE_FILENAME;
use std::path::PathBuf;

/// Get the default database path
///
/// Resolves to `$HOME/.local/share/taskly/taskly.sqlite`, falling back to the
/// current directory when no home directory is available.
#[must_use]
pub fn get_default_database_path() -> PathBuf {
    let base = std::env::var("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(".local").join("share").join("taskly"))
        .unwrap_or_else(|_| PathBuf::from("."));
    base.join(DATABASE_FILENAME)
}

/// Truncate a string to a maximum number of characters, appending an
/// ellipsis when truncated
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}

/// Check whether a string is a valid UUID
#[must_use]
pub fn is_valid_uuid(s: &str) -> bool {
    uuid::Uuid::parse_str(s).is_ok()
}
