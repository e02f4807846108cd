//! Byte spans from the scanners and editor coordinates for the protocol.

use std::cmp::Ordering;

/// Half-open byte span `[start, end)` into a document.
///
/// Scanners work in byte offsets. Offsets are converted to line/column
/// [`Position`]s through a [`LineIndex`](crate::LineIndex) before they reach
/// the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OffsetRange {
    pub start: usize,
    pub end: usize,
}

impl OffsetRange {
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// `end` itself is outside the span.
    #[must_use]
    pub const fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Zero-based line and column, with the column counted in UTF-16 code units
/// as LSP clients expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    #[must_use]
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.line, self.character).cmp(&(other.line, other.character))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Editors show 1-based coordinates
        write!(f, "{}:{}", self.line + 1, self.character + 1)
    }
}

/// Span between two [`Position`]s, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Range of `len` UTF-16 code units starting at `start`, on one line.
    #[must_use]
    pub const fn on_line(start: Position, len: u32) -> Self {
        Self {
            start,
            end: Position::new(start.line, start.character + len),
        }
    }

    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position < self.end
    }
}
