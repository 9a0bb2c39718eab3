//! TCP reachability probe for devctl
//!
//! A probe is a single bounded attempt to open a TCP connection to a
//! `host:port`. The outcome (success or failure, plus latency) is reported as a
//! [`ProbeResult`]; only invalid input and socket release problems surface as
//! [`NetCheckError`].

mod error;
mod probe;

pub use error::{ConnectFailure, NetCheckError, Result};
pub use probe::{ProbeRequest, ProbeResult, probe};
