//! Prober trait abstraction and scan result types.
//!
//! The worker pools in [`range`](super::range) and [`subnet`](super::subnet)
//! only see the [`Prober`] trait, so the connect strategy can be swapped out
//! (a mock in tests, [`TcpProber`](super::TcpProber) in production).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a single probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortState {
    /// A connection was established.
    Open,
    /// The connect attempt failed for any reason (refused, timed out,
    /// unreachable, unresolvable).
    Closed,
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Transport protocol a probe was made over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Tcp,
}

impl Protocol {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tcp => "tcp",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of probing one port on one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Host as it was given to the prober (literal IP or hostname).
    pub host: String,
    pub port: u16,
    pub protocol: Protocol,
    pub state: PortState,
}

impl ProbeResult {
    /// Create a new probe result.
    pub fn new(host: impl Into<String>, port: u16, protocol: Protocol, state: PortState) -> Self {
        Self {
            host: host.into(),
            port,
            protocol,
            state,
        }
    }

    /// Check if the port is open.
    pub fn is_open(&self) -> bool {
        self.state == PortState::Open
    }
}

/// All probe results for one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostScanResult {
    pub host: String,
    /// Strictly ascending by port.
    pub ports: Vec<ProbeResult>,
    /// Number of entries in `ports` classified closed.
    pub closed_count: usize,
}

impl HostScanResult {
    /// Iterate over the open ports only.
    pub fn open_ports(&self) -> impl Iterator<Item = &ProbeResult> {
        self.ports.iter().filter(|r| r.is_open())
    }

    pub fn open_count(&self) -> usize {
        self.ports.len() - self.closed_count
    }
}

/// Per-host results for a whole subnet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetScanResult {
    /// Strictly ascending by numeric IPv4 value.
    pub hosts: Vec<HostScanResult>,
    /// Sum of the hosts' closed counts.
    pub closed_count: usize,
}

impl SubnetScanResult {
    /// Total number of probes performed.
    pub fn ports_scanned(&self) -> usize {
        self.hosts.iter().map(|h| h.ports.len()).sum()
    }
}

impl From<HostScanResult> for SubnetScanResult {
    fn from(host: HostScanResult) -> Self {
        Self {
            closed_count: host.closed_count,
            hosts: vec![host],
        }
    }
}

/// A single connect-and-classify attempt.
///
/// Implementations must make exactly one attempt per call and must never
/// fail: every error is folded into [`PortState::Closed`].
///
/// # Example
///
/// ```ignore
/// use portsweep::scanner::{Prober, TcpProber};
///
/// let prober = TcpProber::default();
/// let result = prober.probe("127.0.0.1", 22).await;
/// println!("{}/{} {}", result.port, result.protocol, result.state);
/// ```
#[async_trait]
pub trait Prober: Send + Sync {
    /// Protocol this prober speaks.
    fn protocol(&self) -> Protocol;

    /// Probe `host:port` once.
    async fn probe(&self, host: &str, port: u16) -> ProbeResult;
}
