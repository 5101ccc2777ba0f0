//! IPv4 subnet targets.
//!
//! `Subnet` is the host enumerator consumed by the subnet scanner: it parses a
//! base address plus prefix length and lazily yields the usable host
//! addresses of the block.

use crate::error::ScanError;
use ipnetwork::Ipv4Network;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// An IPv4 CIDR block to scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subnet {
    network: Ipv4Network,
}

impl Subnet {
    /// Longest valid IPv4 prefix.
    pub const MAX_PREFIX: u8 = 32;

    /// Create a subnet from a base address and prefix length (0-32).
    pub fn new(base: Ipv4Addr, prefix: u8) -> Result<Self, ScanError> {
        let network = Ipv4Network::new(base, prefix)
            .map_err(|_| ScanError::InvalidCidr(format!("{}/{}", base, prefix)))?;
        Ok(Self { network })
    }

    /// Parse a base address and the textual prefix length used on the
    /// command line (e.g. `"24"`, not `"/24"`).
    pub fn parse(host: &str, suffix: &str) -> Result<Self, ScanError> {
        let invalid = || ScanError::InvalidCidr(format!("{}/{}", host.trim(), suffix.trim()));

        let base: Ipv4Addr = host.trim().parse().map_err(|_| invalid())?;
        let prefix: u8 = suffix.trim().parse().map_err(|_| invalid())?;
        if prefix > Self::MAX_PREFIX {
            return Err(invalid());
        }
        Self::new(base, prefix)
    }

    pub fn prefix(&self) -> u8 {
        self.network.prefix()
    }

    /// The network (first) address of the block.
    pub fn network_address(&self) -> Ipv4Addr {
        self.network.network()
    }

    /// The broadcast (last) address of the block.
    pub fn broadcast_address(&self) -> Ipv4Addr {
        self.network.broadcast()
    }

    /// Total number of addresses in the block, endpoints included.
    pub fn address_count(&self) -> u64 {
        1u64 << (32 - u32::from(self.prefix()))
    }

    /// Whether the network and broadcast endpoints are excluded from scanning.
    ///
    /// `/31` point-to-point links (RFC 3021) and `/32` single hosts have no
    /// reserved endpoints.
    pub fn excludes_endpoints(&self) -> bool {
        self.prefix() < 31
    }

    /// Number of addresses `hosts()` will yield.
    pub fn usable_host_count(&self) -> u64 {
        if self.excludes_endpoints() {
            self.address_count() - 2
        } else {
            self.address_count()
        }
    }

    /// Lazily enumerate the usable host addresses in ascending order.
    pub fn hosts(&self) -> impl Iterator<Item = Ipv4Addr> {
        let first = u32::from(self.network_address());
        let last = u32::from(self.broadcast_address());
        let (first, last) = if self.excludes_endpoints() {
            (first + 1, last - 1)
        } else {
            (first, last)
        };
        (first..=last).map(Ipv4Addr::from)
    }
}

impl FromStr for Subnet {
    type Err = ScanError;

    /// Parse `a.b.c.d/n`. A bare address is treated as `/32`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().split_once('/') {
            Some((host, suffix)) => Self::parse(host, suffix),
            None => Self::parse(s, "32"),
        }
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network.ip(), self.prefix())
    }
}
