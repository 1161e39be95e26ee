//! Helpers for sanitizing data before it enters tracing span attributes.

use std::path::Path;

/// Returns only the filename component of a path (no directory).
///
/// Safe for span fields: keeps the file name, drops the directories.
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}
