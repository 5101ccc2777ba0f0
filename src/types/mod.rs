//! Core type definitions using newtype patterns for type safety.
//!
//! These types reject invalid scan parameters (port 0 as a range start, a
//! zero-sized worker pool, an out-of-range CIDR prefix) before any scan runs.

mod concurrency;
mod port;
mod target;

pub use concurrency::Concurrency;
pub use port::{Port, PortError, PortRange};
pub use target::Subnet;
