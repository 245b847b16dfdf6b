//! Canned documentation for JavaScript builtins

use crate::docs::{DocKind, DocLink, DocResult};

const MDN_GLOBAL_OBJECTS: &str =
    "https://developer.mozilla.org/en-US/docs/Web/JavaScript/Reference/Global_Objects";

/// Language identifiers the builtin table applies to
const SUPPORTED_LANGUAGES: &[&str] = &["javascript", "typescript"];

const JS_BUILTINS: &[(&str, &str)] = &[
    (
        "console",
        "The console object provides access to the browser's debugging console.",
    ),
    (
        "Array",
        "The Array object is used to store multiple values in a single variable.",
    ),
    (
        "Object",
        "The Object class represents one of JavaScript's data types.",
    ),
    (
        "Promise",
        "The Promise object represents the eventual completion or failure of an asynchronous operation.",
    ),
    (
        "Map",
        "The Map object holds key-value pairs and remembers the original insertion order of the keys.",
    ),
    ("Set", "The Set object lets you store unique values of any type."),
];

/// Whether builtin lookups apply to this language identifier
pub fn is_supported_language(language_id: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&language_id)
}

/// Look up a builtin by exact name.
///
/// Returns `None` when the language has no builtin table or the symbol is
/// not in it.
pub fn builtin_doc(symbol: &str, language_id: &str) -> Option<DocResult> {
    if !is_supported_language(language_id) {
        return None;
    }

    let (name, description) = JS_BUILTINS.iter().find(|(name, _)| *name == symbol)?;

    Some(DocResult {
        symbol: name.to_string(),
        kind: DocKind::Builtin,
        title: format!("{name} (JavaScript Built-in)"),
        content: description.to_string(),
        source: Some("MDN Web Docs".to_string()),
        links: Some(vec![DocLink::new("MDN", mdn_url(name))]),
    })
}

/// MDN reference page for a global object
pub fn mdn_url(name: &str) -> String {
    format!("{MDN_GLOBAL_OBJECTS}/{name}")
}
