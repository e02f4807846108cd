//! Shared helpers for tests across the workspace.

pub mod assertions;
pub mod fixture;

pub use assertions::format_diagnostics;
pub use fixture::{fixture_with_cursor, CURSOR_MARKER};
