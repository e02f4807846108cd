mod dom_completions;
mod tsserver;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tasks for html-id-analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate the bundled DOM member completion database with tsserver
    ///
    /// Uses `$TSSERVER` when set, then `node_modules/.bin/tsserver`, then
    /// `tsserver` from `PATH`.
    GenerateDomCompletions,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::GenerateDomCompletions => dom_completions::run(&project_root()),
    }
}

fn project_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent()
        .expect("xtask should be in project root")
        .to_path_buf()
}
