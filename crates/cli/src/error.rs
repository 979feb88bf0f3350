//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: placement error (unknown field kind, bad dimensions, bad parameters)
//! - 11: I/O error (reading a recipe, writing curves)
//! - 12: input error (bad JSON params, malformed recipe)
//! - 13: serialization error

use flowlines_core::FlowError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// A core error while building the field, index or configuration.
    Flow(FlowError),
    /// An I/O error (recipe read, curve or recipe write).
    Io(String),
    /// A user input error (bad JSON params, malformed recipe file).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Flow(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }

    /// Wraps an I/O failure on `path`.
    pub fn io(path: &std::path::Path, err: std::io::Error) -> Self {
        CliError::Io(format!("{}: {err}", path.display()))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Flow(e) => write!(f, "{e}"),
            CliError::Io(msg) => write!(f, "{msg}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<FlowError> for CliError {
    fn from(e: FlowError) -> Self {
        CliError::Flow(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            CliError::Io(e.to_string())
        } else {
            CliError::Serialization(e.to_string())
        }
    }
}
