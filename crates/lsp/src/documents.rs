//! Text of the documents the client has open.

use std::collections::HashMap;

use html_id_types::{FileUri, Language};

/// One open document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// `None` for languages the server does not scan
    pub language: Option<Language>,
    pub version: i32,
    pub text: String,
}

impl Document {
    /// Whether the document is scanned for ids.
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        self.language.is_some()
    }
}

/// Open documents indexed by URI.
///
/// Versions are tracked so that a stale `didChange` can't overwrite newer
/// text.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: HashMap<FileUri, Document>,
}

impl DocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a newly opened document, replacing any previous entry.
    pub fn open(&mut self, uri: FileUri, language_id: &str, version: i32, text: String) {
        let language = Language::from_language_id(language_id);
        tracing::debug!(%uri, language_id, version, "Document opened");
        self.documents.insert(
            uri,
            Document {
                language,
                version,
                text,
            },
        );
    }

    /// Replace the text of an open document.
    ///
    /// Returns `false` when the document is unknown or `version` is not
    /// newer than the stored one.
    pub fn update(&mut self, uri: &FileUri, version: i32, text: String) -> bool {
        let Some(document) = self.documents.get_mut(uri) else {
            tracing::debug!(%uri, "Change for unknown document");
            return false;
        };

        if version <= document.version {
            tracing::debug!(
                %uri,
                version,
                current = document.version,
                "Ignoring out-of-order change"
            );
            return false;
        }

        document.version = version;
        document.text = text;
        true
    }

    pub fn close(&mut self, uri: &FileUri) -> Option<Document> {
        self.documents.remove(uri)
    }

    #[must_use]
    pub fn get(&self, uri: &FileUri) -> Option<&Document> {
        self.documents.get(uri)
    }
}
