//! Standalone language server binary.
//!
//! For CLI usage with additional commands, use `html-id lsp` instead.

fn main() -> anyhow::Result<()> {
    html_id_lsp::run_server()
}
