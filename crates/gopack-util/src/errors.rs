use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all gopack operations.
#[derive(Debug, Error, Diagnostic)]
pub enum GopackError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The declaration file is missing, unreadable, or malformed.
    #[error("Config error: {message}")]
    #[diagnostic(help("Check your gopack.config for syntax errors"))]
    Config { message: String },

    /// One or more declared dependencies failed validation.
    ///
    /// `report` holds every failure, one per line; `count` is the number of
    /// failures and doubles as the process exit status.
    #[error("{count} dependency validation error(s):\n{report}")]
    Validation { count: usize, report: String },

    /// Fetching or checking out a dependency failed.
    #[error("Retrieval failed: {message}")]
    Retrieval { message: String },

    /// The run was interrupted before it completed.
    #[error("Operation cancelled")]
    Cancelled,

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

impl GopackError {
    /// Process exit status for this error.
    ///
    /// Validation failures exit with the number of failures, capped at 255
    /// so the status never wraps to 0; everything else exits with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            GopackError::Validation { count, .. } => {
                i32::try_from((*count).min(MAX_EXIT_CODE)).unwrap_or(1)
            }
            _ => 1,
        }
    }
}

const MAX_EXIT_CODE: usize = 255;
