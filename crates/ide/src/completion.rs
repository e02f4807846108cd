//! Completion feature implementation.
//!
//! Two kinds of completion are offered inside script blocks:
//! - element ids as bare identifiers
//! - members of an id's element type after `id.`

use crate::cursor::{identifier_before_dot, is_member_access, text_before_cursor};
use crate::helpers::script_line;
use crate::index::IdentifierIndex;
use crate::member_cache::CompletionCache;
use crate::types::{CompletionItem, CompletionKind, Position};

/// Get completions at a position.
///
/// Returns `None` outside script blocks, and when the cursor follows a dot
/// whose base is not a known id.
pub fn completions(
    index: &IdentifierIndex,
    members: &CompletionCache,
    text: &str,
    position: Position,
) -> Option<Vec<CompletionItem>> {
    let line = script_line(text, position)?;
    let before_cursor = text_before_cursor(line, position.character);

    let ids = (!is_member_access(before_cursor)).then(|| id_completions(index));
    let members = member_completions(index, members, before_cursor);

    match (ids, members) {
        (None, None) => None,
        (ids, members) => Some(ids.into_iter().chain(members).flatten().collect()),
    }
}

/// Every known id, in first-seen order.
fn id_completions(index: &IdentifierIndex) -> Vec<CompletionItem> {
    index
        .iter()
        .filter_map(|(id, sites)| {
            let site = sites.first()?;
            Some(
                CompletionItem::new(id, CompletionKind::Variable)
                    .with_detail(site.element_type)
                    .with_documentation(format!(
                        "HTML element with id=\"{id}\"\n\nType: `{}`\n\nTag: `<{}>`",
                        site.element_type, site.tag_name
                    ))
                    .with_sort_text(format!("0{id}")),
            )
        })
        .collect()
}

/// Members of the element type behind `base.` at the cursor.
fn member_completions(
    index: &IdentifierIndex,
    members: &CompletionCache,
    before_cursor: &str,
) -> Option<Vec<CompletionItem>> {
    let base = identifier_before_dot(before_cursor)?;
    let site = index.first_site(base)?;

    tracing::debug!(id = base, element_type = site.element_type, "Member completion");

    Some(
        members
            .lookup(site.element_type)
            .iter()
            .map(|entry| {
                CompletionItem::new(entry.name.clone(), entry.kind)
                    .with_sort_text(format!("0{}", entry.name))
            })
            .collect(),
    )
}
