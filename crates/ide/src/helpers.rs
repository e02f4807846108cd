//! Shared helpers for the feature modules.

use html_id_extract::is_in_script_region;
use html_id_types::{LineIndex, Position};

/// The cursor's line, if the cursor is inside a script block's content.
pub(crate) fn script_line(text: &str, position: Position) -> Option<&str> {
    let line_index = LineIndex::new(text);
    let offset = line_index.offset_at(position);
    if !is_in_script_region(text, offset) {
        return None;
    }
    line_index.line_text(position.line)
}
