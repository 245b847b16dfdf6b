//! Documentation results shown in the side panel

use serde::{Deserialize, Serialize};

/// Kind of documentation a result carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocKind {
    /// A package declared in the project manifest
    NpmPackage,
    /// A function defined in the workspace
    LocalFunction,
    /// A language builtin
    Builtin,
    /// Nothing matched
    Unknown,
}

impl DocKind {
    /// Badge label used by the panel
    pub fn as_str(&self) -> &'static str {
        match self {
            DocKind::NpmPackage => "npm-package",
            DocKind::LocalFunction => "local-function",
            DocKind::Builtin => "builtin",
            DocKind::Unknown => "unknown",
        }
    }
}

/// A labelled link rendered as a button
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocLink {
    pub label: String,
    pub url: String,
}

impl DocLink {
    pub fn new(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            url: url.into(),
        }
    }
}

/// Documentation for one symbol, built fresh for every request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocResult {
    /// Symbol the lookup was made for
    pub symbol: String,
    #[serde(rename = "type")]
    pub kind: DocKind,
    /// Display title
    pub title: String,
    /// Body in markdown-lite (bold, italic, inline code, line breaks)
    pub content: String,
    /// Attribution, e.g. "npm registry"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<DocLink>>,
}

impl DocResult {
    /// Result for a symbol that matched neither the manifest nor a builtin.
    pub fn unknown(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            kind: DocKind::Unknown,
            title: format!("No documentation found for \"{symbol}\""),
            content: "This symbol could not be identified in your dependencies or as a builtin."
                .to_string(),
            source: None,
            links: None,
        }
    }

    /// Result for a file that imports nothing.
    pub fn no_imports() -> Self {
        Self {
            symbol: "context".to_string(),
            kind: DocKind::Unknown,
            title: "No imports detected".to_string(),
            content: "No packages or modules imported in this file yet.".to_string(),
            source: None,
            links: None,
        }
    }

    /// Links to render, empty when the result has none.
    pub fn links(&self) -> &[DocLink] {
        self.links.as_deref().unwrap_or_default()
    }

    /// Render the result as markdown for hovers and CLI output.
    pub fn to_markdown(&self) -> String {
        let mut parts = vec![format!("## {}\n", self.title), self.content.clone()];

        if let Some(source) = &self.source {
            parts.push(format!("\n*Source: {source}*"));
        }

        let links: Vec<String> = self
            .links()
            .iter()
            .map(|link| format!("[{}]({})", link.label, link.url))
            .collect();
        if !links.is_empty() {
            parts.push(format!("\n{}", links.join(" | ")));
        }

        parts.join("\n")
    }
}
