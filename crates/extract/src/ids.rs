use std::sync::LazyLock;

use html_id_types::OffsetRange;
use regex::Regex;

/// Start of a tag: `<` followed by a word-character tag name.
static TAG_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([A-Za-z0-9_]+)").expect("tag pattern is valid"));

/// An `id` attribute somewhere before the tag's first `>`.
///
/// `[^>]*` is greedy, so when a tag repeats the attribute the last one wins.
static ID_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^[^>]*\sid=["']([^"']+)["']"#).expect("id attribute pattern is valid")
});

/// One `id="..."` attribute found on a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdDeclaration {
    /// Tag name, ASCII-lowercased
    pub tag_name: String,
    /// Attribute value exactly as written
    pub value: String,
    /// Byte range of the value (inside the quotes)
    pub value_range: OffsetRange,
}

/// Find every start tag carrying an `id` attribute, in document order.
///
/// Attribute order inside the tag doesn't matter. Empty values (`id=""`) and
/// tags that never close are not recognised.
#[must_use]
pub fn extract_id_declarations(text: &str) -> Vec<IdDeclaration> {
    let mut declarations = Vec::new();
    let mut cursor = 0;

    while let Some(open) = TAG_OPEN.captures_at(text, cursor) {
        let (Some(whole), Some(name)) = (open.get(0), open.get(1)) else {
            break;
        };
        let after_name = whole.end();

        let rest = &text[after_name..];
        // Without a `>` here no later tag can close either
        let Some(close) = rest.find('>') else {
            break;
        };
        // Tags opened inside this one share its `>`, so none of them can
        // carry an id this one lacks
        cursor = after_name + close + 1;
        let Some(attribute) = ID_ATTRIBUTE.captures(rest).and_then(|caps| caps.get(1)) else {
            continue;
        };

        declarations.push(IdDeclaration {
            tag_name: name.as_str().to_ascii_lowercase(),
            value: attribute.as_str().to_string(),
            value_range: OffsetRange::new(
                after_name + attribute.start(),
                after_name + attribute.end(),
            ),
        });
    }

    declarations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(text: &str) -> Vec<(String, String)> {
        extract_id_declarations(text)
            .into_iter()
            .map(|decl| (decl.tag_name, decl.value))
            .collect()
    }

    #[test]
    fn test_extract_simple() {
        let text = r#"<div id="main"></div>"#;
        let decls = extract_id_declarations(text);

        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].tag_name, "div");
        assert_eq!(decls[0].value, "main");
        assert_eq!(&text[decls[0].value_range.start..decls[0].value_range.end], "main");
    }

    #[test]
    fn test_attribute_order_is_irrelevant() {
        let text = r#"<input type="text" class="wide" id="email" required>"#;
        assert_eq!(values(text), vec![("input".into(), "email".into())]);
    }

    #[test]
    fn test_single_quotes() {
        assert_eq!(values("<p id='intro'>"), vec![("p".into(), "intro".into())]);
    }

    #[test]
    fn test_tag_name_is_lowercased_value_is_not() {
        assert_eq!(
            values(r#"<BUTTON ID="SaveBtn">"#),
            vec![("button".into(), "SaveBtn".into())]
        );
    }

    #[test]
    fn test_document_order_and_duplicates() {
        let text = r#"<div id="x"></div><span id="y"></span><div id="x"></div>"#;
        assert_eq!(
            values(text),
            vec![
                ("div".into(), "x".into()),
                ("span".into(), "y".into()),
                ("div".into(), "x".into()),
            ]
        );
    }

    #[test]
    fn test_multiline_tag() {
        let text = "<section\n  class=\"hero\"\n  id=\"top\"\n>";
        let decls = extract_id_declarations(text);

        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].value, "top");
        assert_eq!(decls[0].value_range.start, text.find("top").unwrap());
    }

    #[test]
    fn test_last_id_attribute_wins() {
        assert_eq!(
            values(r#"<div id="first" id="second">"#),
            vec![("div".into(), "second".into())]
        );
    }

    #[test]
    fn test_ignores_lookalike_attributes() {
        // Attributes that merely end in `id` don't count
        let text = r#"<li data-id="1"></li><label for="x" aria-id="y"></label><b userid="z">"#;
        assert!(values(text).is_empty());
    }

    #[test]
    fn test_requires_whitespace_before_id() {
        assert!(values(r#"<div"id="x">"#).is_empty());
    }

    #[test]
    fn test_empty_value_is_skipped() {
        assert_eq!(
            values(r#"<div id=""></div><p id="ok">"#),
            vec![("p".into(), "ok".into())]
        );
    }

    #[test]
    fn test_unquoted_value_is_skipped() {
        assert!(values("<div id=plain>").is_empty());
    }

    #[test]
    fn test_unterminated_tag_is_skipped() {
        assert!(values(r#"<div id="x""#).is_empty());
    }

    #[test]
    fn test_large_unclosed_tag_finds_later_id() {
        let text = format!("<p {}>\n<div id=\"ok\">", "<a ".repeat(20_000));
        assert_eq!(values(&text), vec![("div".into(), "ok".into())]);
    }

    #[test]
    fn test_many_tags_without_any_close() {
        let text = format!("<div id=\"x\" {}", "<a ".repeat(20_000));
        assert!(values(&text).is_empty());
    }

    #[test]
    fn test_id_after_closing_bracket_belongs_to_text() {
        // The attribute must appear before the tag's first `>`
        assert!(values(r#"<div> id="x"</div>"#).is_empty());
    }

    #[test]
    fn test_comments_are_not_special() {
        let text = r#"<!-- <b id="gone"> is still matched --></div><a href="/" id="home">"#;
        assert_eq!(
            values(text),
            vec![("b".into(), "gone".into()), ("a".into(), "home".into())]
        );
    }

    #[test]
    fn test_value_range_with_multibyte_text() {
        let text = "<p>héllo</p>\n<em id=\"naïve\">";
        let decls = extract_id_declarations(text);

        assert_eq!(decls.len(), 1);
        let range = decls[0].value_range;
        assert_eq!(&text[range.start..range.end], "naïve");
    }

    #[test]
    fn test_empty_document() {
        assert!(extract_id_declarations("").is_empty());
    }
}
