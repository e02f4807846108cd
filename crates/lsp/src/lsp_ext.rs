//! Protocol extensions understood by the server.

use lsp_types::notification::Notification;
use lsp_types::TextDocumentIdentifier;
use serde::{Deserialize, Serialize};

/// Sent by the client when the focused editor changes to another document.
#[derive(Debug)]
pub enum DidChangeActiveDocument {}

impl Notification for DidChangeActiveDocument {
    type Params = DidChangeActiveDocumentParams;
    const METHOD: &'static str = "htmlId/didChangeActiveDocument";
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DidChangeActiveDocumentParams {
    pub text_document: TextDocumentIdentifier,
}
