//! Cursor-marker fixtures.
//!
//! Tests write documents with a `$0` where the cursor sits:
//!
//! ```ignore
//! let (text, position) = fixture_with_cursor("<script>\n  box.$0\n</script>");
//! let items = analysis.completions(&text, position);
//! ```

use html_id_types::{LineIndex, Position};

/// Marker replaced by the cursor position.
pub const CURSOR_MARKER: &str = "$0";

/// Strip the first cursor marker from `fixture`.
///
/// Returns the text without the marker and the marker's position in it.
///
/// # Panics
///
/// Panics if the fixture has no marker. Fixtures are test input, so a
/// missing marker is a bug in the test.
#[must_use]
pub fn fixture_with_cursor(fixture: &str) -> (String, Position) {
    let Some(offset) = fixture.find(CURSOR_MARKER) else {
        panic!("fixture has no {CURSOR_MARKER} cursor marker:\n{fixture}");
    };

    let mut text = String::with_capacity(fixture.len() - CURSOR_MARKER.len());
    text.push_str(&fixture[..offset]);
    text.push_str(&fixture[offset + CURSOR_MARKER.len()..]);

    let position = LineIndex::new(&text).position_at(offset);
    (text, position)
}
