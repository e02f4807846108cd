//! # html-id-ide
//!
//! Editor-facing features for `id` attributes in HTML documents. This crate
//! is the API boundary between the scanners and the LSP layer.
//!
//! ## Core Principle: POD Types with Public Fields
//!
//! - All result types are plain structs with public fields
//! - Types use editor coordinates (URIs, line/UTF-16 column positions)
//! - No LSP types leak into this crate
//!
//! ## Architecture
//!
//! ```text
//! LSP Layer (lsp-server)
//!     ↓
//! html-id-ide (this crate) ← index, member cache, features
//!     ↓                ↓
//! html-id-extract   html-id-dom ← scanners / tag table + completion database
//!     ↓
//! html-id-types
//! ```
//!
//! ## Main Types
//!
//! - [`AnalysisHost`] - Owns the identifier index and the member cache
//! - [`Analysis`] - Borrowed view for querying IDE features
//! - Feature types: [`CompletionItem`], [`HoverResult`], [`Location`], [`Diagnostic`]

use std::collections::HashMap;
use std::sync::Arc;

use html_id_dom::CompletionDatabase;

mod cursor;
mod helpers;
mod index;
mod member_cache;
mod types;

// Feature modules
mod completion;
mod diagnostics;
mod goto_definition;
mod hover;

pub use cursor::{identifier_before_dot, is_member_access, word_at_position, Word};
pub use diagnostics::{duplicate_id_diagnostics, DIAGNOSTIC_SOURCE, DUPLICATE_ID_CODE};
pub use index::{DeclarationSite, IdentifierIndex};
pub use member_cache::{CompletionCache, CompletionEntry};
pub use types::{
    CompletionItem, CompletionKind, Diagnostic, DiagnosticSeverity, FileUri, HoverResult,
    Location, Position, Range,
};

pub use html_id_types::RuleSeverity;

/// Owns the analysis state for one server session.
///
/// The identifier index always reflects the most recently scanned document;
/// [`AnalysisHost::rebuild`] replaces it wholesale. Queries go through an
/// [`Analysis`] borrowed from the host, so a rebuild can't overlap a query.
///
/// ```ignore
/// let mut host = AnalysisHost::new(Arc::new(CompletionDatabase::bundled()?));
/// host.rebuild(&file, text);
/// let items = host.snapshot().completions(text, position);
/// ```
#[derive(Debug)]
pub struct AnalysisHost {
    index: IdentifierIndex,
    members: CompletionCache,
    duplicate_ids: RuleSeverity,
}

impl AnalysisHost {
    /// Create a host with an empty index.
    #[must_use]
    pub fn new(database: Arc<CompletionDatabase>) -> Self {
        Self {
            index: IdentifierIndex::new(),
            members: CompletionCache::new(database),
            duplicate_ids: RuleSeverity::default(),
        }
    }

    /// Set how duplicate ids are reported.
    pub fn set_duplicate_id_severity(&mut self, severity: RuleSeverity) {
        self.duplicate_ids = severity;
    }

    #[must_use]
    pub const fn duplicate_id_severity(&self) -> RuleSeverity {
        self.duplicate_ids
    }

    /// Rescan `text` and replace the index with the result.
    pub fn rebuild(&mut self, file: &FileUri, text: &str) {
        self.index = IdentifierIndex::build(file, text);
    }

    #[must_use]
    pub const fn index(&self) -> &IdentifierIndex {
        &self.index
    }

    /// Borrow the current state for queries.
    #[must_use]
    pub const fn snapshot(&self) -> Analysis<'_> {
        Analysis {
            index: &self.index,
            members: &self.members,
            duplicate_ids: self.duplicate_ids,
        }
    }
}

/// Read-only view of an [`AnalysisHost`].
///
/// Every position-based query takes the text of the requesting document.
/// The ids it resolves against are those of the last scanned document.
#[derive(Debug, Clone, Copy)]
pub struct Analysis<'a> {
    index: &'a IdentifierIndex,
    members: &'a CompletionCache,
    duplicate_ids: RuleSeverity,
}

impl Analysis<'_> {
    /// Get completions at a position
    ///
    /// Returns ids, or the members of an id's element type after a dot.
    #[must_use]
    pub fn completions(&self, text: &str, position: Position) -> Option<Vec<CompletionItem>> {
        completion::completions(self.index, self.members, text, position)
    }

    /// Get hover information for the id under the cursor
    #[must_use]
    pub fn hover(&self, text: &str, position: Position) -> Option<HoverResult> {
        hover::hover(self.index, text, position)
    }

    /// Get every declaration of the id under the cursor
    #[must_use]
    pub fn goto_definition(&self, text: &str, position: Position) -> Option<Vec<Location>> {
        goto_definition::goto_definition(self.index, text, position)
    }

    /// Duplicate id diagnostics for every document in the index
    #[must_use]
    pub fn diagnostics(&self) -> HashMap<FileUri, Vec<Diagnostic>> {
        duplicate_id_diagnostics(self.index, self.duplicate_ids)
    }

    /// Duplicate id diagnostics for one document
    #[must_use]
    pub fn file_diagnostics(&self, file: &FileUri) -> Vec<Diagnostic> {
        self.diagnostics().remove(file).unwrap_or_default()
    }
}
