//! Goto definition feature implementation.

use html_id_types::utf16_len;

use crate::cursor::word_at_position;
use crate::helpers::script_line;
use crate::index::IdentifierIndex;
use crate::types::{Location, Position, Range};

/// Get every declaration of the id under the cursor.
///
/// Unlike hover, all sites are returned so the editor can offer a choice
/// when the id is duplicated. Each location spans the id value.
pub fn goto_definition(
    index: &IdentifierIndex,
    text: &str,
    position: Position,
) -> Option<Vec<Location>> {
    let line = script_line(text, position)?;
    let word = word_at_position(line, position.character)?;
    let sites = index.get(word.text)?;
    let len = utf16_len(word.text);

    Some(
        sites
            .iter()
            .map(|site| Location::new(site.file.clone(), Range::on_line(site.position, len)))
            .collect(),
    )
}
