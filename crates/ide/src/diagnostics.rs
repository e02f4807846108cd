//! Duplicate id diagnostics.

use std::collections::HashMap;

use html_id_types::{utf16_len, FileUri, Range, RuleSeverity};

use crate::index::IdentifierIndex;
use crate::types::Diagnostic;

/// `source` of every diagnostic this crate produces.
pub const DIAGNOSTIC_SOURCE: &str = "html-id-intellisense";

/// `code` of the duplicate id diagnostic.
pub const DUPLICATE_ID_CODE: &str = "duplicate-id";

/// One diagnostic per declaration site of every id declared more than once,
/// grouped by document.
///
/// Returns an empty map when the check is off.
pub fn duplicate_id_diagnostics(
    index: &IdentifierIndex,
    severity: RuleSeverity,
) -> HashMap<FileUri, Vec<Diagnostic>> {
    let mut by_file: HashMap<FileUri, Vec<Diagnostic>> = HashMap::new();
    let Some(severity) = severity.to_diagnostic_severity() else {
        return by_file;
    };

    for (id, sites) in index.iter().filter(|(_, sites)| sites.len() > 1) {
        let message = format!(
            "Duplicate id \"{id}\" found {} times. IDs must be unique.",
            sites.len()
        );
        let len = utf16_len(id);

        for site in sites {
            by_file.entry(site.file.clone()).or_default().push(
                Diagnostic::new(
                    Range::on_line(site.position, len),
                    severity,
                    message.clone(),
                    DIAGNOSTIC_SOURCE,
                )
                .with_code(DUPLICATE_ID_CODE),
            );
        }
    }

    by_file
}
