//! Error types for portsweep.
//!
//! Uses `thiserror` for ergonomic error definitions. Per-probe connection
//! failures never appear here: they are folded into `PortState::Closed`.

use crate::types::PortError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scanning operations.
///
/// Every variant is a configuration or pool-level failure that aborts the
/// whole scan.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid CIDR '{0}': expected an IPv4 address and a prefix length from 0 to 32")]
    InvalidCidr(String),

    #[error("invalid concurrency {0}: at least one worker is required")]
    InvalidConcurrency(usize),

    #[error(transparent)]
    InvalidPortRange(#[from] PortError),

    #[error("scan incomplete: expected {expected} results, received {received}")]
    IncompleteScan { expected: usize, received: usize },

    #[error("scan worker failed: {0}")]
    WorkerFailed(#[from] tokio::task::JoinError),
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors raised while loading application settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine a configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings file: {0}")]
    InvalidFormat(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidFormat(e.to_string())
    }
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors surfaced at the command-line boundary.
#[derive(Error, Debug)]
pub enum CliError {
    /// Rejected user input. Reported, but not treated as a failed run.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl CliError {
    /// Whether the process should exit with a failure status.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Validation(_))
    }
}

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;
