//! Foundation types for the HTML id language server.
//!
//! This crate provides shared types used across the stack.
//! It has zero external dependencies, making it suitable as a foundation layer.
//!
//! # Type Categories
//!
//! - **File types**: [`FileUri`], [`Language`]
//! - **Position types**: [`Position`], [`Range`], [`OffsetRange`], [`LineIndex`]
//! - **Severity types**: [`DiagnosticSeverity`], [`RuleSeverity`]

mod file;
mod line_index;
mod position;
mod severity;

pub use file::{FileUri, Language};
pub use line_index::{utf16_len, LineIndex};
pub use position::{OffsetRange, Position, Range};
pub use severity::{DiagnosticSeverity, ParseSeverityError, RuleSeverity};
