//! Git shortcuts for devctl
//!
//! Thin wrappers that shell out to the `git` binary with inherited stdio.

mod error;
mod runner;

pub use error::{GitError, Result};
pub use runner::{DEFAULT_REMOTE, GitRunner};
