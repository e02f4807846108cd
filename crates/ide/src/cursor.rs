//! Cursor context on a single line of script text.
//!
//! These routines only ever see the cursor's line. Columns are UTF-16 code
//! units, as the editor sends them.

use std::sync::LazyLock;

use html_id_types::{LineIndex, Position};
use regex::Regex;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z_$][a-zA-Z0-9_$]*").expect("word pattern is valid"));

static IDENTIFIER_BEFORE_DOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-zA-Z_$][a-zA-Z0-9_$]*)\.([a-zA-Z_$][a-zA-Z0-9_$]*)?$")
        .expect("member access pattern is valid")
});

static MEMBER_ACCESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\s*[a-zA-Z0-9_$]*$").expect("trailing dot pattern is valid"));

/// An identifier-shaped token on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word<'a> {
    pub text: &'a str,
    /// UTF-16 column of the first character
    pub start: u32,
    /// UTF-16 column just past the last character
    pub end: u32,
}

/// Byte offset of a UTF-16 column within `line`, clamped to the line end.
fn byte_offset(line: &str, character: u32) -> usize {
    LineIndex::new(line).offset_at(Position::new(0, character))
}

/// Text of `line` before the cursor column.
#[must_use]
pub fn text_before_cursor(line: &str, character: u32) -> &str {
    &line[..byte_offset(line, character)]
}

/// The identifier touching the cursor, if any.
///
/// A cursor directly before or directly after a word touches it.
#[must_use]
pub fn word_at_position(line: &str, character: u32) -> Option<Word<'_>> {
    let cursor = byte_offset(line, character);
    let found = WORD
        .find_iter(line)
        .find(|word| word.start() <= cursor && cursor <= word.end())?;

    let line_index = LineIndex::new(line);
    Some(Word {
        text: found.as_str(),
        start: line_index.position_at(found.start()).character,
        end: line_index.position_at(found.end()).character,
    })
}

/// Base identifier of a member access ending at the cursor.
///
/// `box.` and `box.val` both yield `box`. Whitespace between the dot and the
/// partial member yields nothing.
#[must_use]
pub fn identifier_before_dot(before_cursor: &str) -> Option<&str> {
    IDENTIFIER_BEFORE_DOT
        .captures(before_cursor)
        .and_then(|caps| caps.get(1))
        .map(|base| base.as_str())
}

/// Whether the cursor sits after a `.` (and optionally a partial name).
///
/// When this holds, plain id completions are not offered.
#[must_use]
pub fn is_member_access(before_cursor: &str) -> bool {
    MEMBER_ACCESS.is_match(before_cursor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_inside() {
        let word = word_at_position("  box.focus();", 3).unwrap();
        assert_eq!(word.text, "box");
        assert_eq!((word.start, word.end), (2, 5));
    }

    #[test]
    fn test_word_touching_edges() {
        assert_eq!(word_at_position("box.focus", 0).unwrap().text, "box");
        // At the dot: the word ending here wins over the one starting after it
        assert_eq!(word_at_position("box.focus", 3).unwrap().text, "box");
        assert_eq!(word_at_position("box.focus", 9).unwrap().text, "focus");
    }

    #[test]
    fn test_word_allows_dollar_and_underscore() {
        assert_eq!(word_at_position("$el_2 = 1", 2).unwrap().text, "$el_2");
    }

    #[test]
    fn test_word_cannot_start_with_digit() {
        assert_eq!(word_at_position("9lives", 0), None);
        assert_eq!(word_at_position("9lives", 1).unwrap().text, "lives");
    }

    #[test]
    fn test_no_word_in_whitespace() {
        assert_eq!(word_at_position("a  +  b", 3), None);
        assert_eq!(word_at_position("", 0), None);
    }

    #[test]
    fn test_word_columns_are_utf16() {
        let word = word_at_position("'😀' + box", 8).unwrap();
        assert_eq!(word.text, "box");
        assert_eq!((word.start, word.end), (7, 10));
    }

    #[test]
    fn test_identifier_before_dot() {
        assert_eq!(identifier_before_dot("foo."), Some("foo"));
        assert_eq!(identifier_before_dot("  foo.val"), Some("foo"));
        assert_eq!(identifier_before_dot("a.b.c"), Some("b"));
    }

    #[test]
    fn test_identifier_before_dot_rejects_gap() {
        assert_eq!(identifier_before_dot("foo. b"), None);
        assert_eq!(identifier_before_dot("foo"), None);
        assert_eq!(identifier_before_dot("foo.bar()"), None);
        assert_eq!(identifier_before_dot("."), None);
    }

    #[test]
    fn test_is_member_access() {
        assert!(is_member_access("foo."));
        assert!(is_member_access("foo.va"));
        assert!(is_member_access("foo. b"));
        assert!(!is_member_access("foo"));
        assert!(!is_member_access("foo.bar()"));
        assert!(is_member_access("foo.h1"));
    }

    #[test]
    fn test_text_before_cursor() {
        assert_eq!(text_before_cursor("box.focus()", 4), "box.");
        assert_eq!(text_before_cursor("box", 99), "box");
        assert_eq!(text_before_cursor("é.x", 2), "é.");
    }
}
