//! TCP connect prober.
//!
//! Performs standard TCP connect probes using the operating system's socket
//! API. Completes the full handshake, so it needs no special privileges.

use crate::scanner::traits::{PortState, ProbeResult, Prober, Protocol};
use async_trait::async_trait;
use std::future::Future;
use std::io;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{trace, warn};

/// TCP connect prober.
///
/// One attempt per call, bounded by `timeout`. Name resolution happens inside
/// the timeout window, so an unresolvable hostname is just another closed
/// port.
#[derive(Debug, Clone, Copy)]
pub struct TcpProber {
    timeout: Duration,
}

impl TcpProber {
    /// Default connect timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Drive one connect attempt, giving up after `limit`.
///
/// An established connection is shut down again before returning.
async fn classify_connect<F>(host: &str, port: u16, limit: Duration, connect: F) -> PortState
where
    F: Future<Output = io::Result<TcpStream>>,
{
    match timeout(limit, connect).await {
        Ok(Ok(mut stream)) => {
            if let Err(e) = stream.shutdown().await {
                warn!(host, port, error = %e, "failed to close probe connection");
            }
            PortState::Open
        }
        Ok(Err(e)) => {
            trace!(host, port, error = %e, "connect failed");
            PortState::Closed
        }
        Err(_) => {
            trace!(host, port, timeout_ms = limit.as_millis() as u64, "connect timed out");
            PortState::Closed
        }
    }
}

impl Default for TcpProber {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl Prober for TcpProber {
    fn protocol(&self) -> Protocol {
        Protocol::Tcp
    }

    async fn probe(&self, host: &str, port: u16) -> ProbeResult {
        let connect = TcpStream::connect((host, port));
        let state = classify_connect(host, port, self.timeout, connect).await;
        ProbeResult::new(host, port, self.protocol(), state)
    }
}
