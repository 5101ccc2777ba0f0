//! Configuration management for portsweep.
//!
//! Settings live in an XDG-compliant JSON file and provide the defaults that
//! command-line flags override.

mod settings;

pub use settings::{AppSettings, Paths};
