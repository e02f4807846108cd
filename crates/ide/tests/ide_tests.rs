//! Integration tests for html-id-ide.
//!
//! These run against the bundled completion database.

use std::sync::Arc;

use html_id_dom::{CompletionDatabase, FALLBACK_ELEMENT_TYPE};
use html_id_ide::{
    duplicate_id_diagnostics, AnalysisHost, CompletionKind, DiagnosticSeverity, FileUri,
    IdentifierIndex, Position, Range, RuleSeverity, DIAGNOSTIC_SOURCE, DUPLICATE_ID_CODE,
};
use html_id_test_utils::{fixture_with_cursor, format_diagnostics};

fn bundled() -> Arc<CompletionDatabase> {
    Arc::new(CompletionDatabase::bundled().unwrap())
}

fn uri() -> FileUri {
    FileUri::new("file:///project/index.html")
}

// ============================================================================
// End-to-end
// ============================================================================

const DUPLICATE_PAGE: &str = r#"<body>
<div id="x"></div><span id="y"></span><div id="x"></div>
<script>
  x.$0
</script>
</body>"#;

#[test]
fn test_member_completion_uses_first_declaration() {
    let (text, position) = fixture_with_cursor(DUPLICATE_PAGE);
    let database = bundled();
    let mut host = AnalysisHost::new(Arc::clone(&database));
    host.rebuild(&uri(), &text);

    let items = host.snapshot().completions(&text, position).unwrap();
    let labels: Vec<&str> = items.iter().map(|item| item.label.as_str()).collect();
    let expected: Vec<&str> = database
        .members("HTMLDivElement")
        .iter()
        .map(|member| member.name.as_str())
        .collect();

    assert!(!expected.is_empty());
    assert_eq!(labels, expected);
    assert!(items
        .iter()
        .all(|item| item.kind != CompletionKind::Variable));
}

#[test]
fn test_duplicate_page_diagnostics() {
    let (text, _) = fixture_with_cursor(DUPLICATE_PAGE);
    let mut host = AnalysisHost::new(bundled());
    host.rebuild(&uri(), &text);

    let diagnostics = host.snapshot().file_diagnostics(&uri());
    insta::assert_snapshot!(format_diagnostics(&diagnostics), @r#"
    [1] 2:10-2:11 error: Duplicate id "x" found 2 times. IDs must be unique. [duplicate-id]
    [2] 2:48-2:49 error: Duplicate id "x" found 2 times. IDs must be unique. [duplicate-id]
    "#);

    let first = &diagnostics[0];
    assert_eq!(first.source, DIAGNOSTIC_SOURCE);
    assert_eq!(first.code.as_deref(), Some(DUPLICATE_ID_CODE));
    assert_eq!(first.severity, DiagnosticSeverity::Error);
}

#[test]
fn test_custom_element_gets_fallback_members() {
    let page = "<todo-list id=\"todos\"></todo-list>\n<script>\n  todos.$0\n</script>";
    let (text, position) = fixture_with_cursor(page);
    let database = bundled();
    let mut host = AnalysisHost::new(Arc::clone(&database));
    host.rebuild(&uri(), &text);

    let items = host.snapshot().completions(&text, position).unwrap();
    assert!(!items.is_empty());
    assert_eq!(items.len(), database.members(FALLBACK_ELEMENT_TYPE).len());
    assert!(items
        .iter()
        .any(|item| item.label == "addEventListener" && item.kind == CompletionKind::Method));
}

#[test]
fn test_input_members_include_value() {
    let page = "<input id=\"email\">\n<script>\n  email.va$0\n</script>";
    let (text, position) = fixture_with_cursor(page);
    let mut host = AnalysisHost::new(bundled());
    host.rebuild(&uri(), &text);

    let items = host.snapshot().completions(&text, position).unwrap();
    let value = items.iter().find(|item| item.label == "value").unwrap();
    assert_eq!(value.kind, CompletionKind::Property);
    assert_eq!(value.sort_text.as_deref(), Some("0value"));
}

#[test]
fn test_second_script_block() {
    let page = "<script>let a;</script>\n<p id=\"para\"></p>\n<script type=\"module\">\n  pa$0\n</script>";
    let (text, position) = fixture_with_cursor(page);
    let mut host = AnalysisHost::new(bundled());
    host.rebuild(&uri(), &text);

    let items = host.snapshot().completions(&text, position).unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].label, "para");
    assert_eq!(items[0].detail.as_deref(), Some("HTMLParagraphElement"));
}

#[test]
fn test_queries_in_unterminated_script_return_nothing() {
    let page = "<p id=\"para\"></p>\n<script>\n  para.$0";
    let (text, position) = fixture_with_cursor(page);
    let mut host = AnalysisHost::new(bundled());
    host.rebuild(&uri(), &text);

    let analysis = host.snapshot();
    assert_eq!(analysis.completions(&text, position), None);
    assert_eq!(analysis.hover(&text, position), None);
    assert_eq!(analysis.goto_definition(&text, position), None);
}

// ============================================================================
// Diagnostics properties
// ============================================================================

#[test]
fn test_n_declarations_give_n_diagnostics() {
    for n in 2..=5 {
        let text = "<li id=\"item\"></li>\n".repeat(n);
        let index = IdentifierIndex::build(&uri(), &text);
        let by_file = duplicate_id_diagnostics(&index, RuleSeverity::Error);

        let diagnostics = &by_file[&uri()];
        assert_eq!(diagnostics.len(), n);
        for (line, diagnostic) in diagnostics.iter().enumerate() {
            assert_eq!(
                diagnostic.range,
                Range::on_line(Position::new(line as u32, 8), 4)
            );
            assert_eq!(
                diagnostic.message,
                format!("Duplicate id \"item\" found {n} times. IDs must be unique.")
            );
        }
    }
}

#[test]
fn test_distinct_ids_give_no_diagnostics() {
    let text = r#"<a id="one"></a><b id="two"></b><i id="One"></i>"#;
    let index = IdentifierIndex::build(&uri(), text);

    assert!(duplicate_id_diagnostics(&index, RuleSeverity::Error).is_empty());
}

#[test]
fn test_diagnostic_range_counts_utf16_units() {
    let text = r#"<p id="ünï😀"></p><p id="ünï😀"></p>"#;
    let index = IdentifierIndex::build(&uri(), text);
    let by_file = duplicate_id_diagnostics(&index, RuleSeverity::Error);

    let range = by_file[&uri()][0].range;
    assert_eq!(range, Range::on_line(Position::new(0, 7), 5));
}

#[test]
fn test_several_duplicated_ids() {
    let text = "<a id=\"a\"></a>\n<b id=\"b\"></b>\n<a id=\"a\"></a>\n<b id=\"b\"></b>\n<b id=\"b\"></b>";
    let index = IdentifierIndex::build(&uri(), text);
    let diagnostics = duplicate_id_diagnostics(&index, RuleSeverity::Warn)
        .remove(&uri())
        .unwrap();

    insta::assert_snapshot!(format_diagnostics(&diagnostics), @r#"
    [1] 1:8-1:9 warning: Duplicate id "a" found 2 times. IDs must be unique. [duplicate-id]
    [2] 3:8-3:9 warning: Duplicate id "a" found 2 times. IDs must be unique. [duplicate-id]
    [3] 2:8-2:9 warning: Duplicate id "b" found 3 times. IDs must be unique. [duplicate-id]
    [4] 4:8-4:9 warning: Duplicate id "b" found 3 times. IDs must be unique. [duplicate-id]
    [5] 5:8-5:9 warning: Duplicate id "b" found 3 times. IDs must be unique. [duplicate-id]
    "#);
}
