//! Language detection from file names
//!
//! Editors send a language identifier with `didOpen`; this is only used
//! where none is available, such as the command line.

use std::path::Path;

/// Language identifier for JavaScript sources
pub const JAVASCRIPT: &str = "javascript";

/// Language identifier for TypeScript sources
pub const TYPESCRIPT: &str = "typescript";

/// Detect the language identifier from a file path's extension.
///
/// Returns `None` for files that are neither JavaScript nor TypeScript.
pub fn language_id_for_path(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?;
    match extension {
        "js" | "jsx" | "mjs" | "cjs" => Some(JAVASCRIPT),
        "ts" | "tsx" | "mts" | "cts" => Some(TYPESCRIPT),
        _ => None,
    }
}
