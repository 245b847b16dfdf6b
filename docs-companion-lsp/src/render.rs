//! HTML rendering for the documentation panel
//!
//! Bodies use a markdown-lite subset: `**bold**`, `*italic*`, `` `code` ``
//! and line breaks. Each rule is a single non-greedy substitution within a
//! line; nothing nests.

use std::sync::LazyLock;

use regex::Regex;

use crate::docs::DocResult;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid bold regex"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.+?)\*").expect("valid italic regex"));
static INLINE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`(.+?)`").expect("valid inline code regex"));

/// Escape text for use in HTML content and double-quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Render a markdown-lite body to HTML.
///
/// The text is escaped first, so markup in READMEs shows up literally.
pub fn render_markdown_lite(text: &str) -> String {
    let escaped = escape_html(text);
    let html = BOLD.replace_all(&escaped, "<strong>$1</strong>");
    let html = ITALIC.replace_all(&html, "<em>$1</em>");
    let html = INLINE_CODE.replace_all(&html, "<code>$1</code>");
    html.replace('\n', "<br>")
}

/// Render the panel fragment for a result.
///
/// Link buttons carry their target in `data-url`; the panel script turns a
/// click into an open-link request.
pub fn render_doc_html(doc: &DocResult) -> String {
    let mut html = format!(
        "<span class=\"doc-type\">{}</span>\n<h1>{}</h1>\n<div class=\"content\">{}</div>\n",
        doc.kind.as_str(),
        escape_html(&doc.title),
        render_markdown_lite(&doc.content)
    );

    if let Some(source) = &doc.source {
        html.push_str(&format!(
            "<div class=\"source\">Source: {}</div>\n",
            escape_html(source)
        ));
    }

    if !doc.links().is_empty() {
        html.push_str("<div class=\"links\">");
        for link in doc.links() {
            html.push_str(&format!(
                "<a href=\"#\" data-url=\"{}\">{}</a>",
                escape_html(&link.url),
                escape_html(&link.label)
            ));
        }
        html.push_str("</div>\n");
    }

    html
}
