//! Scanner module - the concurrent scanning engine.
//!
//! Two levels of fixed-size worker pools sit on top of a [`Prober`]:
//!
//! - [`RangeScanner`] probes a port interval on one host.
//! - [`SubnetScanner`] runs one range scan per usable host of a subnet.
//!
//! Pools communicate over bounded tokio channels; the only shared mutable
//! state is each range scan's closed-port counter.

pub mod probe;
pub mod range;
pub mod subnet;
pub mod traits;

#[cfg(test)]
pub(crate) mod mock;

pub use probe::TcpProber;
pub use range::{scan_ports, RangeScanner};
pub use subnet::{scan_subnet, SubnetScanner};
pub use traits::{HostScanResult, PortState, ProbeResult, Prober, Protocol, SubnetScanResult};
