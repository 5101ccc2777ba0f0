//! Command-line interface for portsweep.
//!
//! Global flags live on [`Cli`]; the scan parameters are flattened in from
//! [`ScanCommand`].

mod scan;

pub use scan::{ScanCommand, Target};

use crate::config::AppSettings;
use crate::error::{ConfigError, ConfigResult};
use crate::output;
use clap::Parser;
use std::path::PathBuf;

/// portsweep - a concurrent TCP connect port scanner.
///
/// Scans a port range on a single host, or on every usable host of an IPv4
/// subnet when `--cidr` is given with an IPv4 `--host`.
#[derive(Parser, Debug)]
#[command(name = "portsweep")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A concurrent TCP connect port scanner", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub scan: ScanCommand,

    /// Enable verbose output (debug logs and a progress bar)
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to a settings file (defaults to the XDG config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Load settings from `--config` or the default location.
    ///
    /// A missing config directory is not an error: defaults apply.
    pub fn settings(&self) -> ConfigResult<AppSettings> {
        match &self.config {
            Some(path) => AppSettings::load_from(path),
            None => match AppSettings::load() {
                Err(ConfigError::DirectoryNotFound) => {
                    if !self.quiet {
                        output::print_warning("no configuration directory found, using defaults");
                    }
                    Ok(AppSettings::default())
                }
                other => other,
            },
        }
    }

    /// Default log filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }
}
