//! Import extraction from JavaScript and TypeScript source
//!
//! This is a lexical scan, not a parse. Two patterns are applied over the
//! whole text:
//!
//! - static imports: `import x from "pkg"`
//! - CommonJS requires: `require("pkg")`
//!
//! Commented-out code and imports inside string literals still match, and
//! dynamic `import()` or re-exports are not recognized.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static STATIC_IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"import\s+.*?\s+from\s+['"]([^'"]+)['"]"#).expect("valid import regex")
});

static REQUIRE_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"require\s*\(\s*['"]([^'"]+)['"]\s*\)"#).expect("valid require regex")
});

/// Extract the top-level package names a source file imports.
///
/// Static imports come first in scan order, followed by `require` calls.
/// Duplicates are dropped, keeping the first occurrence. Relative specifiers
/// are skipped.
pub fn extract_imports(source: &str) -> Vec<String> {
    let specifiers = STATIC_IMPORT
        .captures_iter(source)
        .chain(REQUIRE_CALL.captures_iter(source))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str());

    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for specifier in specifiers {
        // Relative and absolute paths name no package; later imports still count
        let Some(name) = package_name(specifier) else {
            continue;
        };
        if seen.insert(name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Reduce a module specifier to the package that provides it.
///
/// `@scope/name/sub` becomes `@scope/name`, `name/sub` becomes `name`.
/// Returns `None` for relative paths and specifiers with no package segment.
pub fn package_name(specifier: &str) -> Option<&str> {
    let end = if specifier.starts_with('@') {
        specifier
            .match_indices('/')
            .nth(1)
            .map_or(specifier.len(), |(idx, _)| idx)
    } else {
        specifier.find('/').unwrap_or(specifier.len())
    };

    let name = &specifier[..end];
    if name.is_empty() || name.starts_with('.') {
        return None;
    }
    Some(name)
}
