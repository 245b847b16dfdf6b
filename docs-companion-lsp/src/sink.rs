//! Notifications that push results to the editor's documentation panel

use serde::{Deserialize, Serialize};
use tower_lsp::lsp_types::notification::Notification;

use crate::docs::DocResult;
use crate::render::render_doc_html;

/// `docsCompanion/updateDoc`: replace the panel content.
///
/// The editor reveals the panel unless `silent` is set.
pub enum UpdateDoc {}

impl Notification for UpdateDoc {
    type Params = UpdateDocParams;
    const METHOD: &'static str = "docsCompanion/updateDoc";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDocParams {
    pub doc: DocResult,
    /// Pre-rendered panel fragment
    pub html: String,
    pub silent: bool,
}

impl UpdateDocParams {
    pub fn new(doc: DocResult, silent: bool) -> Self {
        let html = render_doc_html(&doc);
        Self { doc, html, silent }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_wire_shape() {
        let params = UpdateDocParams::new(DocResult::no_imports(), true);
        let json = serde_json::to_value(&params).unwrap();

        assert_eq!(json["silent"], true);
        assert_eq!(json["doc"]["type"], "unknown");
        assert_eq!(json["doc"]["title"], "No imports detected");
        assert!(json["html"].as_str().unwrap().contains("<h1>No imports detected</h1>"));
    }

    #[test]
    fn test_method_name() {
        assert_eq!(UpdateDoc::METHOD, "docsCompanion/updateDoc");
    }
}
