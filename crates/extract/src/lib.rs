//! Best-effort extraction from raw HTML text.
//!
//! Nothing here parses HTML. The scanners use targeted patterns to find `id`
//! attributes on start tags and the content of `<script>` blocks. Constructs
//! the patterns don't recognise (a start tag with no closing `>`, a script
//! block with no `</script>`) are skipped, never reported.

mod ids;
mod script;

pub use ids::{extract_id_declarations, IdDeclaration};
pub use script::{is_in_script_region, script_regions, ScriptRegion};

// Re-export types from html-id-types for convenience
pub use html_id_types::OffsetRange;
