//! Server session state.
//!
//! A [`Session`] owns everything the server knows: the open documents, the
//! analysis host with the identifier index, and the set of documents that
//! currently show diagnostics. It is driven by the main loop one event at a
//! time and never touches the transport; events that change the index return
//! a [`DiagnosticsUpdate`] for the caller to publish.

use std::collections::HashSet;
use std::sync::Arc;

use html_id_dom::CompletionDatabase;
use html_id_ide::{
    AnalysisHost, CompletionItem, Diagnostic, FileUri, HoverResult, Location, Position,
    RuleSeverity,
};

use crate::documents::{Document, DocumentStore};

/// Lifecycle phase of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not yet activated. Document events update the store only.
    Inactive,
    /// Activated, no document scanned yet.
    ActiveNoIndex,
    /// The index holds the most recently scanned document.
    ActiveWithIndex,
}

/// Diagnostics to publish, one entry per document, sorted by URI.
///
/// An empty list clears the document's diagnostics.
pub type DiagnosticsUpdate = Vec<(FileUri, Vec<Diagnostic>)>;

#[derive(Debug)]
pub struct Session {
    phase: Phase,
    documents: DocumentStore,
    host: AnalysisHost,
    /// Documents whose last publication was non-empty
    published: HashSet<FileUri>,
}

impl Session {
    #[must_use]
    pub fn new(database: Arc<CompletionDatabase>, duplicate_ids: RuleSeverity) -> Self {
        let mut host = AnalysisHost::new(database);
        host.set_duplicate_id_severity(duplicate_ids);
        Self {
            phase: Phase::Inactive,
            documents: DocumentStore::new(),
            host,
            published: HashSet::new(),
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    #[must_use]
    pub const fn host(&self) -> &AnalysisHost {
        &self.host
    }

    /// Leave [`Phase::Inactive`], scanning `focused` right away if it is an
    /// eligible open document. Activating twice is a no-op.
    pub fn activate(&mut self, focused: Option<&FileUri>) -> Option<DiagnosticsUpdate> {
        if self.phase != Phase::Inactive {
            return None;
        }
        self.phase = Phase::ActiveNoIndex;
        tracing::info!(focused = focused.map(FileUri::as_str), "Session activated");

        focused.and_then(|uri| self.rescan(uri))
    }

    pub fn did_open(
        &mut self,
        uri: FileUri,
        language_id: &str,
        version: i32,
        text: String,
    ) -> Option<DiagnosticsUpdate> {
        self.documents.open(uri.clone(), language_id, version, text);
        self.rescan(&uri)
    }

    /// Full-text change of an open document.
    pub fn did_change(
        &mut self,
        uri: &FileUri,
        version: i32,
        text: String,
    ) -> Option<DiagnosticsUpdate> {
        if !self.documents.update(uri, version, text) {
            return None;
        }
        self.rescan(uri)
    }

    /// The editor switched to `uri`.
    pub fn did_focus(&mut self, uri: &FileUri) -> Option<DiagnosticsUpdate> {
        self.rescan(uri)
    }

    /// Forget the document's text. The index is left as it is.
    pub fn did_close(&mut self, uri: &FileUri) {
        if self.documents.close(uri).is_some() {
            tracing::debug!(%uri, "Document closed");
        }
    }

    #[must_use]
    pub fn completions(&self, uri: &FileUri, position: Position) -> Option<Vec<CompletionItem>> {
        let document = self.queryable(uri)?;
        self.host.snapshot().completions(&document.text, position)
    }

    #[must_use]
    pub fn hover(&self, uri: &FileUri, position: Position) -> Option<HoverResult> {
        let document = self.queryable(uri)?;
        self.host.snapshot().hover(&document.text, position)
    }

    #[must_use]
    pub fn goto_definition(&self, uri: &FileUri, position: Position) -> Option<Vec<Location>> {
        let document = self.queryable(uri)?;
        self.host.snapshot().goto_definition(&document.text, position)
    }

    /// The document a query may run against.
    fn queryable(&self, uri: &FileUri) -> Option<&Document> {
        if self.phase == Phase::Inactive {
            return None;
        }
        self.documents.get(uri).filter(|doc| doc.is_eligible())
    }

    /// Rebuild the index from `uri` if it is an eligible open document.
    #[tracing::instrument(skip_all, fields(uri = %uri))]
    fn rescan(&mut self, uri: &FileUri) -> Option<DiagnosticsUpdate> {
        if self.phase == Phase::Inactive {
            tracing::trace!("Session inactive, not scanning");
            return None;
        }

        let document = self.documents.get(uri).filter(|doc| doc.is_eligible())?;
        self.host.rebuild(uri, &document.text);

        if self.phase != Phase::ActiveWithIndex {
            tracing::debug!(from = ?self.phase, "Index available");
            self.phase = Phase::ActiveWithIndex;
        }
        tracing::info!(
            ids = self.host.index().len(),
            version = document.version,
            "Rebuilt identifier index"
        );

        Some(self.take_diagnostics())
    }

    /// Current diagnostics, plus explicit clears for documents that showed
    /// diagnostics last time and have none now.
    fn take_diagnostics(&mut self) -> DiagnosticsUpdate {
        let current = self.host.snapshot().diagnostics();

        let mut update: DiagnosticsUpdate = self
            .published
            .drain()
            .filter(|uri| !current.contains_key(uri))
            .map(|uri| (uri, Vec::new()))
            .collect();

        self.published = current.keys().cloned().collect();
        update.extend(current);
        update.sort_by(|(a, _), (b, _)| a.cmp(b));
        update
    }
}
