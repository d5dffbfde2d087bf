//! Error types for the scoring engine
//!
//! Only a handful of conditions are allowed to abort a run: a missing root
//! path, a rule that fails to compile, a config file that fails to parse and a
//! report that cannot be written. Everything else degrades into the
//! critical-issues / warnings model of the decision.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the engine
#[derive(Error, Debug)]
pub enum GateError {
    #[error("Path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Invalid rule '{name}': {source}")]
    InvalidRule {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid config {}: {message}", path.display())]
    InvalidConfig { path: PathBuf, message: String },

    #[error("Project tests could not be executed: {0}")]
    ProjectTestExecution(String),

    #[error("Failed to write report {}: {source}", path.display())]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GateError {
    /// Process exit code for a fatal error.
    ///
    /// A missing root gets its own code so callers can tell "nothing was
    /// scored" apart from "scored and rejected".
    pub fn exit_code(&self) -> u8 {
        match self {
            GateError::PathNotFound(_) => 2,
            _ => 1,
        }
    }
}

pub type GateResult<T> = Result<T, GateError>;
