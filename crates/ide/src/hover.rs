//! Hover feature implementation.

use std::fmt::Write as _;

use crate::cursor::word_at_position;
use crate::helpers::script_line;
use crate::index::IdentifierIndex;
use crate::types::{HoverResult, Position, Range};

/// Get hover information for an id referenced in a script block.
///
/// The type shown is the one of the id's first declaration. Duplicated ids
/// get a warning line.
pub fn hover(index: &IdentifierIndex, text: &str, position: Position) -> Option<HoverResult> {
    let line = script_line(text, position)?;
    let word = word_at_position(line, position.character)?;
    let sites = index.get(word.text)?;
    let site = sites.first()?;

    let mut contents = format!(
        "```typescript\nconst {}: {}\n```\n\nHTML element: `<{} id=\"{}\">`",
        word.text, site.element_type, site.tag_name, word.text
    );
    if sites.len() > 1 {
        let _ = write!(
            contents,
            "\n\n⚠️ **Warning:** This ID is duplicated {} times",
            sites.len()
        );
    }

    let range = Range::new(
        Position::new(position.line, word.start),
        Position::new(position.line, word.end),
    );
    Some(HoverResult::new(contents).with_range(range))
}
