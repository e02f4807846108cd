use std::sync::LazyLock;

use html_id_types::OffsetRange;
use regex::Regex;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<script[^>]*>((?s:.*?))</script>").expect("script pattern is valid")
});

/// A `<script>...</script>` block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptRegion {
    /// Text between the opening tag's `>` and `</script>`
    pub content: OffsetRange,
}

/// Every terminated script block in the document, in order.
#[must_use]
pub fn script_regions(text: &str) -> Vec<ScriptRegion> {
    SCRIPT_BLOCK
        .captures_iter(text)
        .filter_map(|caps| {
            let content = caps.get(1)?;
            Some(ScriptRegion {
                content: OffsetRange::new(content.start(), content.end()),
            })
        })
        .collect()
}

/// Whether `offset` falls inside the content of any script block.
///
/// The content span is end-exclusive: the offset of the `<` in `</script>`
/// is outside.
#[must_use]
pub fn is_in_script_region(text: &str, offset: usize) -> bool {
    script_regions(text)
        .iter()
        .any(|region| region.content.contains(offset))
}
