//! LSP server command
//!
//! Starts the html-id language server on stdio.

use anyhow::Result;
use html_id_lsp::ServerOptions;
use std::path::PathBuf;

/// Run the LSP server until the client sends `exit`.
///
/// An explicit `--config` replaces discovery from the workspace root.
pub fn run(config_path: Option<PathBuf>) -> Result<()> {
    html_id_lsp::run_server_with(&ServerOptions { config_path })
}
