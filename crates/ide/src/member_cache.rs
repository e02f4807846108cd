//! Memoised member completion entries per element type.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use html_id_dom::{CompletionDatabase, MemberKind};

use crate::types::CompletionKind;

/// A member ready to be offered as a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionEntry {
    pub name: String,
    /// [`CompletionKind::Method`] or [`CompletionKind::Property`]
    pub kind: CompletionKind,
}

/// Lazily converts database rows into [`CompletionEntry`] lists.
///
/// The database never changes after load, so an entry list is computed at
/// most once per type name and shared afterwards. Unknown types cache an
/// empty list.
#[derive(Debug)]
pub struct CompletionCache {
    database: Arc<CompletionDatabase>,
    entries: RefCell<HashMap<String, Arc<[CompletionEntry]>>>,
}

impl CompletionCache {
    #[must_use]
    pub fn new(database: Arc<CompletionDatabase>) -> Self {
        Self {
            database,
            entries: RefCell::new(HashMap::new()),
        }
    }

    /// Completion entries for `type_name`, in database order.
    pub fn lookup(&self, type_name: &str) -> Arc<[CompletionEntry]> {
        if let Some(entries) = self.entries.borrow().get(type_name) {
            return Arc::clone(entries);
        }

        let entries: Arc<[CompletionEntry]> = self
            .database
            .members(type_name)
            .iter()
            .map(|member| CompletionEntry {
                name: member.name.clone(),
                kind: match member.kind {
                    MemberKind::Method => CompletionKind::Method,
                    MemberKind::Property => CompletionKind::Property,
                },
            })
            .collect();

        tracing::trace!(type_name, count = entries.len(), "Cached member completions");
        self.entries
            .borrow_mut()
            .insert(type_name.to_string(), Arc::clone(&entries));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use html_id_dom::Member;

    fn cache() -> CompletionCache {
        let mut database = CompletionDatabase::new();
        database.insert(
            "HTMLInputElement",
            vec![Member::method("focus"), Member::property("value")],
        );
        CompletionCache::new(Arc::new(database))
    }

    #[test]
    fn test_lookup_converts_kinds() {
        let entries = cache().lookup("HTMLInputElement");

        assert_eq!(
            entries.as_ref(),
            &[
                CompletionEntry {
                    name: "focus".into(),
                    kind: CompletionKind::Method
                },
                CompletionEntry {
                    name: "value".into(),
                    kind: CompletionKind::Property
                },
            ]
        );
    }

    #[test]
    fn test_second_lookup_is_shared() {
        let cache = cache();
        let first = cache.lookup("HTMLInputElement");
        let second = cache.lookup("HTMLInputElement");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.entries.borrow().len(), 1);
    }

    #[test]
    fn test_unknown_type_is_empty_both_times() {
        let cache = cache();

        assert!(cache.lookup("HTMLMarqueeElement").is_empty());
        assert!(cache.lookup("HTMLMarqueeElement").is_empty());
        assert_eq!(cache.entries.borrow().len(), 1);
    }
}
