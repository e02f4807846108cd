//! Language server for `id` attributes in HTML documents.
//!
//! The server speaks LSP over stdio and is typically started through
//! `html-id lsp`. It keeps an index of the ids declared in the most recently
//! scanned HTML document and offers them inside `<script>` blocks.

mod conversions;
mod documents;
mod lsp_ext;
mod server;
mod session;

pub use conversions::{IntoIde, IntoLsp};
pub use documents::{Document, DocumentStore};
pub use lsp_ext::{DidChangeActiveDocument, DidChangeActiveDocumentParams};
pub use server::{serve, ServerOptions, SERVER_NAME};
pub use session::{DiagnosticsUpdate, Phase, Session};

use lsp_server::Connection;

/// Initialize tracing for the LSP server.
///
/// This function is safe to call even if tracing has already been initialized
/// (e.g., when running as `html-id lsp` subcommand). It will simply skip
/// initialization if a global subscriber is already set.
pub fn init_tracing() {
    // IMPORTANT: LSP uses stdin/stdout for JSON-RPC communication
    // All logs MUST go to stderr to avoid breaking the protocol
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

/// Run the language server over stdio with default options.
pub fn run_server() -> anyhow::Result<()> {
    run_server_with(&ServerOptions::default())
}

/// Run the language server over stdio.
///
/// Returns after the client sends `shutdown` and `exit`.
///
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     html_id_lsp::run_server()
/// }
/// ```
pub fn run_server_with(options: &ServerOptions) -> anyhow::Result<()> {
    init_tracing();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting {SERVER_NAME}");

    let (connection, io_threads) = Connection::stdio();
    serve(&connection, options)?;
    io_threads.join()?;

    tracing::info!("Server stopped");
    Ok(())
}
