//! Exit codes for the html-id CLI.
//!
//! Scripts and CI systems can tell a document problem apart from a broken
//! setup by the code alone.

/// Exit codes used by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// No error-severity diagnostics
    Success = 0,
    /// At least one error-severity diagnostic was reported
    DiagnosticError = 1,
    /// Configuration file could not be read or is invalid
    ConfigError = 2,
    /// An input path could not be walked or read
    IoError = 4,
}

impl ExitCode {
    /// Exit the process with this exit code.
    pub fn exit(self) -> ! {
        std::process::exit(self as i32)
    }

    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::DiagnosticError => write!(f, "duplicate id error"),
            Self::ConfigError => write!(f, "configuration error"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
