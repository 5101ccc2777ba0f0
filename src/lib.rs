//! # portsweep - A Concurrent TCP Port Scanner
//!
//! portsweep probes TCP ports on a single host or on every usable host of an
//! IPv4 subnet, reporting which ports accept connections.
//!
//! ## Features
//!
//! - **TCP Connect Probes**: one timeout-bounded connect attempt per port
//! - **Bounded Worker Pools**: a fixed number of probe workers per host, and
//!   a fixed number of host workers per subnet
//! - **Ordered Results**: ports ascending, hosts ascending by numeric address
//! - **Multiple Output Formats**: Plain text, JSON, and CSV
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use portsweep::scanner::{scan_ports, scan_subnet};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), portsweep::ScanError> {
//!     // Ports 20-25 on one host, 10 probes in flight.
//!     let host = scan_ports("192.168.1.1", 20, 25, 10).await?;
//!     for port in host.open_ports() {
//!         println!("{}/{} open", port.port, port.protocol);
//!     }
//!
//!     // Port 22 on every host of a /24.
//!     let subnet = scan_subnet("192.168.1.0", 24, 22, 0, 32).await?;
//!     println!("{} closed ports", subnet.closed_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Validated ports, port ranges, pool sizes and subnets
//! - [`scanner`] - The prober trait and the two worker-pool scanners
//! - [`services`] - Well-known service names by port
//! - [`output`] - Report formatting
//! - [`config`] - Settings file handling
//! - [`cli`] - Command-line interface
//! - [`error`] - Error types

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use cli::Cli;
pub use error::{CliError, ScanError};
pub use scanner::{HostScanResult, PortState, ProbeResult, Prober, SubnetScanResult};
pub use types::{Concurrency, Port, PortRange, Subnet};
