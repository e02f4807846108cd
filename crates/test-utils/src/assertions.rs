//! Formatting helpers for diagnostic snapshots.

/// Number each diagnostic on its own line, using its `Display` form.
///
/// ```ignore
/// use html_id_test_utils::format_diagnostics;
///
/// let diagnostics = host.snapshot().file_diagnostics(&file);
/// insta::assert_snapshot!(format_diagnostics(&diagnostics));
/// ```
pub fn format_diagnostics<D: std::fmt::Display>(diagnostics: &[D]) -> String {
    if diagnostics.is_empty() {
        return String::from("(no diagnostics)");
    }

    diagnostics
        .iter()
        .enumerate()
        .map(|(i, d)| format!("[{}] {d}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}
