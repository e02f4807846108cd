//! Type conversion functions between LSP types and html-id-ide types
//!
//! These conversions are stateless and can be used from any LSP handler.
//!
//! ```rust,ignore
//! use crate::conversions::{IntoIde, IntoLsp};
//!
//! // IDE -> LSP
//! let lsp_range = ide_range.into_lsp();
//!
//! // LSP -> IDE
//! let ide_position = lsp_position.into_ide();
//! ```

use html_id_ide::FileUri;
use lsp_types::{Diagnostic, DiagnosticSeverity, Location, Position, Range, Uri};

/// Extension trait for converting html-id-ide types to LSP types.
pub trait IntoLsp {
    /// The LSP type this converts to
    type Output;
    /// Convert to the corresponding LSP type
    fn into_lsp(self) -> Self::Output;
}

/// Extension trait for converting LSP types to html-id-ide types.
pub trait IntoIde {
    /// The IDE type this converts to
    type Output;
    /// Convert to the corresponding IDE type
    fn into_ide(self) -> Self::Output;
}

impl IntoLsp for html_id_ide::Position {
    type Output = Position;
    fn into_lsp(self) -> Position {
        Position {
            line: self.line,
            character: self.character,
        }
    }
}

impl IntoIde for Position {
    type Output = html_id_ide::Position;
    fn into_ide(self) -> html_id_ide::Position {
        html_id_ide::Position::new(self.line, self.character)
    }
}

impl IntoLsp for html_id_ide::Range {
    type Output = Range;
    fn into_lsp(self) -> Range {
        Range {
            start: self.start.into_lsp(),
            end: self.end.into_lsp(),
        }
    }
}

impl IntoIde for &Uri {
    type Output = FileUri;
    fn into_ide(self) -> FileUri {
        FileUri::new(self.to_string())
    }
}

impl IntoLsp for &FileUri {
    /// `None` when the stored string is not a valid URI
    type Output = Option<Uri>;
    fn into_lsp(self) -> Option<Uri> {
        self.as_str().parse().ok()
    }
}

// Location conversions (reference version for efficiency)
impl IntoLsp for &html_id_ide::Location {
    type Output = Option<Location>;
    fn into_lsp(self) -> Option<Location> {
        Some(Location {
            uri: (&self.file).into_lsp()?,
            range: self.range.into_lsp(),
        })
    }
}

impl IntoLsp for html_id_ide::Diagnostic {
    type Output = Diagnostic;
    fn into_lsp(self) -> Diagnostic {
        let severity = match self.severity {
            html_id_ide::DiagnosticSeverity::Error => DiagnosticSeverity::ERROR,
            html_id_ide::DiagnosticSeverity::Warning => DiagnosticSeverity::WARNING,
            html_id_ide::DiagnosticSeverity::Information => DiagnosticSeverity::INFORMATION,
            html_id_ide::DiagnosticSeverity::Hint => DiagnosticSeverity::HINT,
        };

        Diagnostic {
            range: self.range.into_lsp(),
            severity: Some(severity),
            code: self.code.map(lsp_types::NumberOrString::String),
            source: Some(self.source),
            message: self.message,
            ..Default::default()
        }
    }
}

impl IntoLsp for html_id_ide::HoverResult {
    type Output = lsp_types::Hover;
    fn into_lsp(self) -> lsp_types::Hover {
        lsp_types::Hover {
            contents: lsp_types::HoverContents::Markup(lsp_types::MarkupContent {
                kind: lsp_types::MarkupKind::Markdown,
                value: self.contents,
            }),
            range: self.range.map(IntoLsp::into_lsp),
        }
    }
}

impl IntoLsp for html_id_ide::CompletionItem {
    type Output = lsp_types::CompletionItem;
    fn into_lsp(self) -> lsp_types::CompletionItem {
        lsp_types::CompletionItem {
            label: self.label,
            kind: Some(match self.kind {
                html_id_ide::CompletionKind::Variable => lsp_types::CompletionItemKind::VARIABLE,
                html_id_ide::CompletionKind::Property => lsp_types::CompletionItemKind::PROPERTY,
                html_id_ide::CompletionKind::Method => lsp_types::CompletionItemKind::METHOD,
            }),
            detail: self.detail,
            documentation: self.documentation.map(|doc| {
                lsp_types::Documentation::MarkupContent(lsp_types::MarkupContent {
                    kind: lsp_types::MarkupKind::Markdown,
                    value: doc,
                })
            }),
            sort_text: self.sort_text,
            ..Default::default()
        }
    }
}
