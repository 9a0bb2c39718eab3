use std::future::Future;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use tokio::io::AsyncWriteExt;
use tokio::net::{TcpStream, lookup_host};

use crate::error::{ConnectFailure, NetCheckError, Result};

type Attempt<T> = std::result::Result<T, ConnectFailure>;

/// A validated probe target. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeRequest {
    host: String,
    port: u16,
    timeout: Duration,
}

impl ProbeRequest {
    /// Validate and build a request. Nothing touches the network here.
    pub fn new(host: impl Into<String>, port: u16, timeout: Duration) -> Result<Self> {
        let host = host.into();
        let host = host.trim();
        // `[::1]` is accepted and stored bare; the resolver only takes `::1`
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host)
            .to_string();
        if host.is_empty() {
            return Err(NetCheckError::InvalidInput("host must not be empty".into()));
        }
        if port == 0 {
            return Err(NetCheckError::InvalidInput(
                "port must be between 1 and 65535".into(),
            ));
        }
        if timeout.is_zero() {
            return Err(NetCheckError::InvalidInput(
                "timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            host,
            port,
            timeout,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `host:port`, with IPv6 literals bracketed
    pub fn address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Outcome of a single probe
#[derive(Clone, Debug)]
pub struct ProbeResult {
    pub address: String,
    pub succeeded: bool,
    /// Time from attempt start to connection establishment or failure
    pub latency: Duration,
    pub failure: Option<ConnectFailure>,
    /// Set when the socket could not be shut down cleanly after a success
    pub close_warning: Option<String>,
}

impl ProbeResult {
    fn success(address: String, latency: Duration, close_warning: Option<String>) -> Self {
        Self {
            address,
            succeeded: true,
            latency,
            failure: None,
            close_warning,
        }
    }

    fn failure(address: String, latency: Duration, failure: ConnectFailure) -> Self {
        Self {
            address,
            succeeded: false,
            latency,
            failure: Some(failure),
            close_warning: None,
        }
    }

    /// Human-readable cause of a failed probe
    pub fn failure_reason(&self) -> Option<String> {
        self.failure.as_ref().map(ToString::to_string)
    }
}

/// Attempt one TCP connection to the request's target.
///
/// Resolution and connect together are bounded by the request timeout. On
/// success the socket is shut down and dropped before returning; on timeout
/// the in-flight connect future is dropped along with any half-open socket.
pub async fn probe(request: &ProbeRequest) -> ProbeResult {
    let address = request.address();
    tracing::debug!(%address, timeout = ?request.timeout(), "probing");

    let (outcome, latency) = bounded(
        request.timeout(),
        connect(request.host().to_string(), request.port()),
    )
    .await;

    match outcome {
        Ok(stream) => {
            let close_warning = close(stream).await.err().map(|e| {
                tracing::warn!(%address, error = %e, "socket close failed");
                match e {
                    NetCheckError::CloseFailure(source) => source.to_string(),
                    other => other.to_string(),
                }
            });
            ProbeResult::success(address, latency, close_warning)
        }
        Err(failure) => {
            tracing::debug!(%address, %failure, ?latency, "probe failed");
            ProbeResult::failure(address, latency, failure)
        }
    }
}

/// Run `attempt` under `limit`, measuring elapsed time up to its terminal outcome
async fn bounded<T, F>(limit: Duration, attempt: F) -> (Attempt<T>, Duration)
where
    F: Future<Output = Attempt<T>>,
{
    let start = Instant::now();
    let outcome = tokio::time::timeout(limit, attempt).await;
    let elapsed = start.elapsed();

    match outcome {
        Ok(result) => (result, elapsed),
        Err(_) => (Err(ConnectFailure::Timeout(limit)), elapsed),
    }
}

/// Resolve then try each address once, in resolver order
async fn connect(host: String, port: u16) -> Attempt<TcpStream> {
    let addrs: Vec<SocketAddr> = lookup_host((host.as_str(), port))
        .await
        .map_err(|e| ConnectFailure::Resolve(format!("{host}: {e}")))?
        .collect();

    if addrs.is_empty() {
        return Err(ConnectFailure::Resolve(format!("{host}: no addresses found")));
    }

    let mut last_failure = None;
    for addr in addrs {
        match TcpStream::connect(addr).await {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!(%addr, error = %e, "connect failed");
                last_failure = Some(ConnectFailure::from_io(&e));
            }
        }
    }

    Err(last_failure.unwrap_or_else(|| ConnectFailure::Other("no address attempted".into())))
}

async fn close(mut stream: TcpStream) -> Result<()> {
    let shutdown = stream.shutdown().await;
    drop(stream);
    shutdown.map_err(NetCheckError::CloseFailure)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    fn request(host: &str, port: u16, timeout: Duration) -> ProbeRequest {
        ProbeRequest::new(host, port, timeout).unwrap()
    }

    #[test]
    fn test_rejects_invalid_input() {
        let secs = Duration::from_secs(1);
        assert!(matches!(
            ProbeRequest::new("", 80, secs),
            Err(NetCheckError::InvalidInput(_))
        ));
        assert!(matches!(
            ProbeRequest::new("   ", 80, secs),
            Err(NetCheckError::InvalidInput(_))
        ));
        assert!(matches!(
            ProbeRequest::new("example.com", 0, secs),
            Err(NetCheckError::InvalidInput(_))
        ));
        assert!(matches!(
            ProbeRequest::new("example.com", 80, Duration::ZERO),
            Err(NetCheckError::InvalidInput(_))
        ));
        assert!(matches!(
            ProbeRequest::new("[]", 80, secs),
            Err(NetCheckError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_address_formatting() {
        let secs = Duration::from_secs(1);
        assert_eq!(request(" example.com ", 443, secs).address(), "example.com:443");
        assert_eq!(request("::1", 8080, secs).address(), "[::1]:8080");
        assert_eq!(request("127.0.0.1", 80, secs).host(), "127.0.0.1");

        let bracketed = request("[::1]", 8080, secs);
        assert_eq!(bracketed.host(), "::1");
        assert_eq!(bracketed.address(), "[::1]:8080");
        assert_eq!(bracketed, request("::1", 8080, secs));
    }

    #[tokio::test]
    async fn test_bracketed_ipv6_host_connects() {
        // Hosts without an IPv6 loopback have nothing to check
        let Ok(listener) = TcpListener::bind("[::1]:0").await else {
            return;
        };
        let port = listener.local_addr().unwrap().port();

        let result = probe(&request("[::1]", port, Duration::from_secs(1))).await;

        assert!(result.succeeded, "{:?}", result.failure);
        assert_eq!(result.address, format!("[::1]:{port}"));
    }

    #[tokio::test]
    async fn test_open_port_succeeds() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let timeout = Duration::from_secs(1);

        let result = probe(&request("127.0.0.1", port, timeout)).await;

        assert!(result.succeeded);
        assert!(result.failure_reason().is_none());
        assert!(result.latency <= timeout);
        assert!(result.latency < Duration::from_millis(100));
        assert_eq!(result.address, format!("127.0.0.1:{port}"));
    }

    #[tokio::test]
    async fn test_closed_port_is_refused() {
        // Grab a free port, then release it so nothing is listening
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let timeout = Duration::from_secs(1);

        let result = probe(&request("127.0.0.1", port, timeout)).await;

        assert!(!result.succeeded);
        assert!(matches!(result.failure, Some(ConnectFailure::Refused(_))));
        assert!(result.failure_reason().unwrap().contains("refused"));
        assert!(result.latency < timeout);
    }

    #[tokio::test]
    async fn test_unresolvable_host_fails() {
        let timeout = Duration::from_secs(5);
        let result = probe(&request("devctl-probe.invalid", 80, timeout)).await;

        assert!(!result.succeeded);
        assert!(matches!(
            result.failure,
            Some(ConnectFailure::Resolve(_)) | Some(ConnectFailure::Timeout(_))
        ));
        assert!(result.latency <= timeout + Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_stalled_attempt_times_out() {
        let limit = Duration::from_millis(50);
        let (outcome, elapsed) =
            bounded(limit, std::future::pending::<Attempt<()>>()).await;

        assert_eq!(outcome, Err(ConnectFailure::Timeout(limit)));
        assert!(elapsed >= limit);
        assert!(elapsed < limit + Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_bounded_passes_through_fast_outcomes() {
        let (outcome, elapsed) = bounded(Duration::from_secs(1), async {
            Err::<(), _>(ConnectFailure::Other("boom".into()))
        })
        .await;

        assert_eq!(outcome, Err(ConnectFailure::Other("boom".into())));
        assert!(elapsed < Duration::from_secs(1));
    }
}
