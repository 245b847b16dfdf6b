//! Common utility functions used across the LSP implementation.

/// Marker appended to text that was cut short
pub const ELLIPSIS: &str = "...";

/// Keeps the first `max_chars` characters of a string, appending an ellipsis
/// when anything was dropped.
///
/// Characters are Unicode scalar values, so multi-byte text is never split
/// inside a code point. The ellipsis is not counted toward `max_chars`, and a
/// string of exactly `max_chars` characters is returned unchanged.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{ELLIPSIS}", &s[..cut]),
        None => s.to_string(),
    }
}
