//! Offset ↔ position mapping for a document's text.

use crate::Position;

/// Line index over a borrowed source text.
///
/// Maps byte offsets to editor [`Position`]s and back. Columns are counted in
/// UTF-16 code units, which is what LSP clients address by default.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    /// Byte offset of the start of each line
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    /// Create a new line index from source text
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];

        for (i, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(i + 1);
            }
        }

        Self { text, line_starts }
    }

    /// The indexed text.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Get the number of lines
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Get the byte offset of the start of a line
    #[must_use]
    pub fn line_start(&self, line: usize) -> Option<usize> {
        self.line_starts.get(line).copied()
    }

    /// Text of a line without its line terminator (`\n` or `\r\n`).
    #[must_use]
    pub fn line_text(&self, line: u32) -> Option<&'a str> {
        let line = line as usize;
        let start = self.line_start(line)?;
        let end = self
            .line_start(line + 1)
            .map_or(self.text.len(), |next| next - 1);
        let text = &self.text[start..end];
        Some(text.strip_suffix('\r').unwrap_or(text))
    }

    /// Convert a byte offset to a position.
    ///
    /// Offsets past the end of the text clamp to the end; offsets inside a
    /// multi-byte character snap back to the character's start.
    #[must_use]
    pub fn position_at(&self, offset: usize) -> Position {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }

        let line = self
            .line_starts
            .binary_search(&offset)
            .unwrap_or_else(|i| i.saturating_sub(1));
        let character = utf16_len(&self.text[self.line_starts[line]..offset]);

        Position::new(line as u32, character)
    }

    /// Convert a position to a byte offset.
    ///
    /// A line past the end maps to the end of the text and a character past
    /// the end of its line maps to the end of that line.
    #[must_use]
    pub fn offset_at(&self, position: Position) -> usize {
        let Some(line_text) = self.line_text(position.line) else {
            return self.text.len();
        };
        let start = self.line_starts[position.line as usize];

        let mut units = 0u32;
        for (i, c) in line_text.char_indices() {
            if units >= position.character {
                return start + i;
            }
            units += c.len_utf16() as u32;
        }

        start + line_text.len()
    }
}

/// Length of a string in UTF-16 code units.
#[must_use]
pub fn utf16_len(text: &str) -> u32 {
    text.chars().map(|c| c.len_utf16() as u32).sum()
}
