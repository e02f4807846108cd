mod commands;
mod exit_code;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "html-id")]
#[command(about = "Duplicate id checks and a language server for HTML documents", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Force colored output even when not a TTY
    #[arg(long, global = true, conflicts_with = "no_color")]
    color: bool,

    /// Disable colored output
    #[arg(long, global = true, conflicts_with = "color")]
    no_color: bool,

    /// Suppress all output except diagnostics and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Output verbosity options
#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    /// Whether to show informational output (success messages, summaries)
    pub show_info: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Report duplicate ids in HTML files
    ///
    /// Directories are searched recursively for `.html` and `.htm` files,
    /// skipping `node_modules`. Exits with 1 when an error is found.
    Check {
        /// Files or directories to check (defaults to the current directory)
        #[arg(value_name = "PATH")]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Start the Language Server Protocol (LSP) server
    ///
    /// The server communicates via stdio using JSON-RPC.
    Lsp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON output for tooling
    Json,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The LSP sets up its own subscriber with ANSI disabled. Initializing
    // the CLI one first would make its try_init() a no-op.
    if matches!(cli.command, Commands::Lsp) {
        return commands::lsp::run(cli.config);
    }

    init_tracing();
    configure_colors(cli.color, cli.no_color);

    let output_opts = OutputOptions {
        show_info: !cli.quiet,
    };

    let exit_code = match cli.command {
        Commands::Check { paths, format } => {
            commands::check::run(cli.config, &paths, format, output_opts)
        }
        Commands::Lsp => unreachable!("handled above"),
    };

    if exit_code != exit_code::ExitCode::Success {
        exit_code.exit();
    }
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Apply `--color`/`--no-color`, then the `NO_COLOR`, `CLICOLOR_FORCE` and
/// `CLICOLOR` conventions, in that order. With none of them set, `colored`
/// decides from whether stdout is a terminal.
fn configure_colors(force_color: bool, no_color: bool) {
    use colored::control;

    let env_is = |name: &str, pred: fn(&str) -> bool| {
        std::env::var(name).is_ok_and(|value| pred(&value))
    };

    if force_color {
        control::set_override(true);
    } else if no_color || std::env::var_os("NO_COLOR").is_some() {
        control::set_override(false);
    } else if env_is("CLICOLOR_FORCE", |v| !v.is_empty() && v != "0") {
        control::set_override(true);
    } else if env_is("CLICOLOR", |v| v == "0") {
        control::set_override(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_check_arguments() {
        let cli = Cli::parse_from([
            "html-id",
            "check",
            "site",
            "index.html",
            "--format",
            "json",
            "--quiet",
        ]);

        assert!(cli.quiet);
        let Commands::Check { paths, format } = cli.command else {
            panic!("expected check");
        };
        assert_eq!(
            paths,
            vec![PathBuf::from("site"), PathBuf::from("index.html")]
        );
        assert_eq!(format, OutputFormat::Json);
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::parse_from(["html-id", "lsp", "--config", "htmlid.config.json"]);

        assert!(matches!(cli.command, Commands::Lsp));
        assert_eq!(cli.config, Some(PathBuf::from("htmlid.config.json")));
    }

    #[test]
    fn test_color_flags_conflict() {
        let result = Cli::try_parse_from(["html-id", "--color", "--no-color", "check"]);
        assert!(result.is_err());
    }
}
