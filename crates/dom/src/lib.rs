//! DOM knowledge for the HTML id language server.
//!
//! Two static tables live here:
//!
//! - the tag → element type table ([`element_type_for_tag`]), which decides
//!   what an `<input id="name">` is typed as inside scripts
//! - the member completion database ([`CompletionDatabase`]), generated
//!   offline by `cargo xtask generate-dom-completions` and loaded once at
//!   startup
//!
//! The database artifact is versioned. A mismatched artifact is rejected at
//! load time rather than silently producing empty completions.

mod database;
mod error;
mod tag_types;

pub use database::{CompletionDatabase, Member, MemberKind, FORMAT_VERSION};
pub use error::{DatabaseError, Result};
pub use tag_types::{element_type_for_tag, ELEMENT_TYPES, FALLBACK_ELEMENT_TYPE};
