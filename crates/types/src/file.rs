//! File-related types: [`FileUri`], [`Language`].

use std::path::Path;
use std::sync::Arc;

/// A URI string identifying a document.
///
/// This is typically a `file://` URI for local files, but editors also hand
/// out `untitled:` and other schemes for unsaved buffers, so the value is
/// treated as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileUri(Arc<str>);

impl FileUri {
    /// Create a new `FileUri` from a string.
    #[must_use]
    pub fn new(uri: impl Into<Arc<str>>) -> Self {
        Self(uri.into())
    }

    /// Create a `FileUri` from a filesystem path, converting to a `file://` URI.
    ///
    /// Strings that already carry a scheme are passed through unchanged.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let path_str = path.to_string_lossy();

        if path_str.contains("://") {
            return Self::new(path_str.as_ref());
        }

        if path_str.starts_with('/') {
            return Self::new(format!("file://{path_str}"));
        }

        // Windows or relative path
        Self::new(format!("file:///{}", path_str.replace('\\', "/")))
    }

    /// Get the URI as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FileUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FileUri {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Markup language of a document.
///
/// Only documents with a recognised language are eligible for scanning;
/// everything else is ignored by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// HTML documents (`languageId` "html", `.html`, `.htm`)
    Html,
}

impl Language {
    /// Classify a document by the language id the editor reports for it.
    #[must_use]
    pub fn from_language_id(language_id: &str) -> Option<Self> {
        match language_id {
            "html" => Some(Self::Html),
            _ => None,
        }
    }

    /// Detect language from a file path based on its extension.
    ///
    /// Returns `None` if the extension is not recognized.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;

        match extension.to_ascii_lowercase().as_str() {
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    /// The LSP language id for this language.
    #[must_use]
    pub const fn language_id(self) -> &'static str {
        match self {
            Self::Html => "html",
        }
    }
}
