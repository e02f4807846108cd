//! The identifier index: id value → declaration sites for one document.

use std::collections::HashMap;

use html_id_dom::element_type_for_tag;
use html_id_extract::extract_id_declarations;
use html_id_types::{FileUri, LineIndex, Position};

/// One `id` attribute occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationSite {
    /// Lowercase tag name
    pub tag_name: String,
    /// DOM type the element is exposed as in scripts
    pub element_type: &'static str,
    /// Start of the id value (not the attribute name)
    pub position: Position,
    pub file: FileUri,
}

/// Declaration sites of every id in a document, keyed by id value.
///
/// Ids iterate in first-seen order and each id's sites are in document
/// order. An index is always built from a whole document; there is no
/// incremental update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentifierIndex {
    file: Option<FileUri>,
    /// Distinct id values in first-seen order
    order: Vec<String>,
    sites: HashMap<String, Vec<DeclarationSite>>,
}

impl IdentifierIndex {
    /// An index with no ids, not tied to any document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan `text` and index every id declaration in it.
    #[tracing::instrument(skip_all, fields(file = %file, len = text.len()))]
    #[must_use]
    pub fn build(file: &FileUri, text: &str) -> Self {
        let line_index = LineIndex::new(text);
        let mut index = Self {
            file: Some(file.clone()),
            ..Self::default()
        };

        for declaration in extract_id_declarations(text) {
            let site = DeclarationSite {
                element_type: element_type_for_tag(&declaration.tag_name),
                tag_name: declaration.tag_name,
                position: line_index.position_at(declaration.value_range.start),
                file: file.clone(),
            };

            match index.sites.get_mut(&declaration.value) {
                Some(sites) => sites.push(site),
                None => {
                    index.order.push(declaration.value.clone());
                    index.sites.insert(declaration.value, vec![site]);
                }
            }
        }

        tracing::debug!(ids = index.len(), "Built identifier index");
        index
    }

    /// Document the index was built from.
    #[must_use]
    pub const fn file(&self) -> Option<&FileUri> {
        self.file.as_ref()
    }

    /// Every declaration site of `id`, in document order.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&[DeclarationSite]> {
        self.sites.get(id).map(Vec::as_slice)
    }

    /// The site used for type inference when an id is declared more than once.
    #[must_use]
    pub fn first_site(&self, id: &str) -> Option<&DeclarationSite> {
        self.get(id).and_then(<[DeclarationSite]>::first)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.sites.contains_key(id)
    }

    /// Number of distinct id values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ids with their sites, in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DeclarationSite])> {
        self.order.iter().filter_map(|id| {
            self.sites
                .get(id)
                .map(|sites| (id.as_str(), sites.as_slice()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uri() -> FileUri {
        FileUri::new("file:///site/index.html")
    }

    #[test]
    fn test_build_records_sites() {
        let text = "<body>\n  <input type=\"text\" id=\"email\">\n</body>";
        let index = IdentifierIndex::build(&uri(), text);

        let site = index.first_site("email").unwrap();
        assert_eq!(site.tag_name, "input");
        assert_eq!(site.element_type, "HTMLInputElement");
        assert_eq!(site.position, Position::new(1, 25));
        assert_eq!(site.file, uri());
        assert_eq!(index.file(), Some(&uri()));
    }

    #[test]
    fn test_position_is_value_start_on_its_own_line() {
        // The id attribute sits two lines below the `<` of its tag
        let text = "<button\n  class=\"primary\"\n  id=\"save\">Save</button>";
        let index = IdentifierIndex::build(&uri(), text);

        assert_eq!(
            index.first_site("save").unwrap().position,
            Position::new(2, 6)
        );
    }

    #[test]
    fn test_position_uses_utf16_columns() {
        let text = "<p>😀</p><p id=\"after\">";
        let index = IdentifierIndex::build(&uri(), text);

        // The emoji is two UTF-16 units
        assert_eq!(
            index.first_site("after").unwrap().position,
            Position::new(0, 16)
        );
    }

    #[test]
    fn test_duplicates_accumulate_in_order() {
        let text = r#"<div id="x"></div><span id="y"></span><section id="x"></section>"#;
        let index = IdentifierIndex::build(&uri(), text);

        let sites = index.get("x").unwrap();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].tag_name, "div");
        assert_eq!(sites[1].tag_name, "section");
        assert_eq!(index.first_site("x").unwrap().element_type, "HTMLDivElement");
    }

    #[test]
    fn test_iteration_is_first_seen_order() {
        let text = r#"<b id="zeta"></b><i id="alpha"></i><b id="zeta"></b><u id="mid"></u>"#;
        let index = IdentifierIndex::build(&uri(), text);

        let ids: Vec<&str> = index.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec!["zeta", "alpha", "mid"]);
        assert_eq!(index.len(), 3);
    }

    #[test]
    fn test_ids_are_case_sensitive() {
        let index = IdentifierIndex::build(&uri(), r#"<a id="Nav"></a><a id="nav"></a>"#);

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("Nav").unwrap().len(), 1);
        assert!(!index.contains("NAV"));
    }

    #[test]
    fn test_unknown_tag_uses_fallback_type() {
        let index = IdentifierIndex::build(&uri(), r#"<user-card id="card"></user-card>"#);
        assert_eq!(index.first_site("card").unwrap().element_type, "HTMLElement");
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let text = r#"<div id="a"></div><p id="b"></p><div id="a"></div>"#;
        let first = IdentifierIndex::build(&uri(), text);
        let second = IdentifierIndex::build(&uri(), text);

        assert_eq!(first, second);
        let first_order: Vec<_> = first.iter().map(|(id, s)| (id, s.to_vec())).collect();
        let second_order: Vec<_> = second.iter().map(|(id, s)| (id, s.to_vec())).collect();
        assert_eq!(first_order, second_order);
    }

    #[test]
    fn test_empty_index() {
        let index = IdentifierIndex::new();
        assert!(index.is_empty());
        assert!(index.get("anything").is_none());
        assert!(index.file().is_none());
    }
}
