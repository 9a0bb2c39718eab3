//! Error types for reachability checks.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Result type alias for netcheck operations.
pub type Result<T> = std::result::Result<T, NetCheckError>;

/// Errors raised before or after a probe, never for an unreachable target.
#[derive(Debug, Error)]
pub enum NetCheckError {
    /// Host, port or timeout rejected before any network activity.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The socket could not be released after a successful connect.
    #[error("failed to close connection: {0}")]
    CloseFailure(#[source] io::Error),
}

/// Why a connection attempt did not succeed.
///
/// Reported inside a [`ProbeResult`](crate::ProbeResult) rather than returned
/// as an error: an unreachable target is a valid probe outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectFailure {
    /// The attempt did not finish within the configured timeout.
    Timeout(Duration),
    /// The target actively refused the connection.
    Refused(String),
    /// The host name could not be resolved to any address.
    Resolve(String),
    /// Any other socket-level failure (unreachable network, reset, ...).
    Other(String),
}

impl ConnectFailure {
    pub(crate) fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => Self::Refused(err.to_string()),
            io::ErrorKind::TimedOut => Self::Other(format!("operating system timeout: {err}")),
            _ => Self::Other(err.to_string()),
        }
    }
}

impl std::fmt::Display for ConnectFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout(limit) => write!(f, "connection timed out after {limit:?}"),
            Self::Refused(detail) => write!(f, "connection refused ({detail})"),
            Self::Resolve(detail) => write!(f, "could not resolve host: {detail}"),
            Self::Other(detail) => f.write_str(detail),
        }
    }
}
