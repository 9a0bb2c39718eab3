use std::io;
use std::process::ExitStatus;

use thiserror::Error;

/// Result type alias for git operations.
pub type Result<T> = std::result::Result<T, GitError>;

#[derive(Debug, Error)]
pub enum GitError {
    /// A required argument was empty.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The git binary could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// git ran but exited unsuccessfully.
    #[error("`{command}` failed ({status})")]
    Failed { command: String, status: ExitStatus },

    #[error("could not determine the current branch (detached HEAD?)")]
    NoCurrentBranch,
}
