//! Configuration for the HTML id language server and CLI.
//!
//! Config files are discovered by walking up from a start directory. The
//! same schema is accepted as LSP `initializationOptions`, which take
//! precedence over the file.

mod config;
mod error;
mod loader;

pub use config::{DiagnosticsConfig, HtmlIdConfig};
pub use error::{ConfigError, Result};
pub use loader::{find_config, load_config, load_config_from_str, CONFIG_FILES};
