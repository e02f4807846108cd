use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatabaseError>;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to read completion database {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse completion database: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unsupported completion database version {found:?} (expected {expected})")]
    UnsupportedVersion { found: Option<u32>, expected: u32 },
}
