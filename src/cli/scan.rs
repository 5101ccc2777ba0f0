//! Scan command implementation.
//!
//! Validates the scan flags, picks single-host or subnet mode, runs the scan
//! and prints the report.

use crate::config::AppSettings;
use crate::error::{CliError, CliResult};
use crate::output::{self, OutputFormat, ScanReport};
use crate::scanner::{RangeScanner, SubnetScanResult, SubnetScanner, TcpProber};
use crate::types::{Concurrency, PortRange, Subnet};
use chrono::Utc;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};
use tracing::debug;

/// Scan parameters.
#[derive(Args, Debug)]
pub struct ScanCommand {
    /// Host to scan: an IPv4 address (optionally the base of a subnet) or a hostname
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Subnet prefix length for an IPv4 host, as a bare integer (24, not /24)
    #[arg(long, visible_alias = "CIDR", default_value = "32")]
    pub cidr: String,

    /// First port to scan
    #[arg(long = "ps", default_value = "1", allow_negative_numbers = true)]
    pub start_port: i64,

    /// Last port to scan (0 scans only the first port)
    #[arg(long = "pe", default_value = "0", allow_negative_numbers = true)]
    pub end_port: i64,

    /// How many connections to attempt at once [default: from settings, 100]
    #[arg(long = "con")]
    pub concurrency: Option<usize>,

    /// Probe workers per host in subnet mode [default: same as --con]
    #[arg(long = "port-con")]
    pub port_concurrency: Option<usize>,

    /// Connect timeout per probe in milliseconds [default: from settings, 1000]
    #[arg(short = 't', long)]
    pub timeout: Option<u64>,

    /// Output format for results [default: from settings, plain]
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Show closed ports in output
    #[arg(long)]
    pub show_closed: bool,
}

/// What a scan command resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A hostname, scanned directly.
    Host(String),
    /// An IPv4 block (a `/32` for a single address).
    Subnet(Subnet),
}

impl ScanCommand {
    /// Validate the port flags.
    ///
    /// `--pe 0` selects single-port mode.
    pub fn port_range(&self) -> CliResult<PortRange> {
        let (ps, pe) = (self.start_port, self.end_port);
        if ps <= 0 || pe < 0 || ps > 65535 || pe > 65535 {
            return Err(CliError::Validation(
                "The numbers you input for ports are invalid. Please check again.".to_string(),
            ));
        }
        if ps > pe && pe != 0 {
            return Err(CliError::Validation(
                "Your starting port is greater than your ending port. \
                 Please input a starting port lower than or equal to your ending port."
                    .to_string(),
            ));
        }

        // Both bounds were checked against 1..=65535 / 0..=65535 above.
        PortRange::from_bounds(ps as u16, pe as u16).map_err(|e| CliError::Scan(e.into()))
    }

    /// Decide between single-host and subnet mode.
    ///
    /// A host whose first dot-separated label is numeric is treated as an
    /// IPv4 address, so a malformed address is reported as an invalid CIDR
    /// rather than looked up as a hostname.
    pub fn target(&self) -> CliResult<Target> {
        let host = self.host.trim();
        let looks_numeric = host
            .split('.')
            .next()
            .is_some_and(|label| label.parse::<u32>().is_ok());

        if looks_numeric {
            Ok(Target::Subnet(Subnet::parse(host, &self.cidr)?))
        } else {
            Ok(Target::Host(host.to_string()))
        }
    }

    /// Execute the scan and print the report.
    pub async fn execute(&self, settings: &AppSettings, verbose: bool, quiet: bool) -> CliResult<()> {
        let range = self.port_range()?;
        let target = self.target()?;

        let concurrency = Concurrency::new(self.concurrency.unwrap_or(settings.default_concurrency))?;
        let port_concurrency = match self.port_concurrency {
            Some(n) => Concurrency::new(n)?,
            None => concurrency,
        };
        let timeout = Duration::from_millis(self.timeout.unwrap_or(settings.default_timeout_ms));
        let format = self.output.unwrap_or(settings.default_output_format);
        let prober = TcpProber::new(timeout);
        let show_header = !quiet && format == OutputFormat::Plain;

        debug!(?target, range = %range, %concurrency, %port_concurrency, ?timeout, "scan configured");

        let started_at = Utc::now();
        let start = Instant::now();

        let (label, result): (String, SubnetScanResult) = match target {
            Target::Host(host) => {
                if self.cidr.trim() != "32" && !quiet {
                    output::print_warning("--cidr applies only to IPv4 hosts; scanning the host alone");
                }
                if show_header {
                    output::print_scan_header(&host, 1, range.port_count(), port_concurrency.get());
                }

                let scanner = RangeScanner::new(prober, port_concurrency);
                let result = scanner.scan(&host, range).await?;
                (host, result.into())
            }
            Target::Subnet(subnet) => {
                let hosts = subnet.usable_host_count();
                if hosts > settings.max_subnet_hosts {
                    return Err(CliError::Other(format!(
                        "{} contains {} hosts, more than the configured maximum of {}",
                        subnet, hosts, settings.max_subnet_hosts
                    )));
                }
                if show_header {
                    output::print_scan_header(&subnet.to_string(), hosts, range.port_count(), concurrency.get());
                }

                let mut scanner = SubnetScanner::new(prober, concurrency)
                    .with_port_concurrency(port_concurrency);
                if verbose && !quiet {
                    scanner = scanner.with_progress(host_progress(hosts));
                }

                let result = scanner.scan(&subnet, range).await?;
                (subnet.to_string(), result)
            }
        };

        let report = ScanReport::new(label, started_at, start.elapsed(), &result, self.show_closed);
        output::print_results(&report, format)?;

        Ok(())
    }
}

fn host_progress(hosts: u64) -> ProgressBar {
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} hosts ({percent}%) {msg}",
    )
    .map(|s| s.progress_chars("=>-"))
    .unwrap_or_else(|_| ProgressStyle::default_bar());

    ProgressBar::new(hosts).with_style(style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanError;
    use crate::Cli;
    use clap::Parser;

    fn command(args: &[&str]) -> ScanCommand {
        let mut argv = vec!["portsweep"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv).scan
    }

    #[test]
    fn test_port_range_defaults_to_single_port() {
        let range = command(&[]).port_range().unwrap();
        assert_eq!(range, PortRange::from_bounds(1, 1).unwrap());
    }

    #[test]
    fn test_invalid_port_numbers() {
        for args in [
            &["--ps", "0"][..],
            &["--ps", "70000"][..],
            &["--pe", "-1"][..],
            &["--ps", "1", "--pe", "65536"][..],
        ] {
            let err = command(args).port_range().unwrap_err();
            assert!(matches!(err, CliError::Validation(ref msg) if msg.contains("invalid")));
            assert!(!err.is_fatal());
        }
    }

    #[test]
    fn test_start_after_end() {
        let err = command(&["--ps", "100", "--pe", "50"]).port_range().unwrap_err();
        assert!(matches!(err, CliError::Validation(ref msg) if msg.contains("greater")));
    }

    #[test]
    fn test_full_range() {
        let range = command(&["--ps", "1", "--pe", "65535"]).port_range().unwrap();
        assert_eq!(range.port_count(), 65535);
    }

    #[test]
    fn test_ipv4_host_is_subnet_target() {
        let target = command(&["--host", "192.168.0.0", "--cidr", "30"]).target().unwrap();
        assert_eq!(target, Target::Subnet(Subnet::parse("192.168.0.0", "30").unwrap()));
    }

    #[test]
    fn test_hostname_is_host_target() {
        let target = command(&["--host", "localhost"]).target().unwrap();
        assert_eq!(target, Target::Host("localhost".to_string()));
    }

    #[test]
    fn test_bad_cidr_is_fatal() {
        let err = command(&["--host", "10.0.0.0", "--cidr", "40"]).target().unwrap_err();
        assert!(matches!(err, CliError::Scan(ScanError::InvalidCidr(_))));
        assert!(err.is_fatal());

        let err = command(&["--host", "10.0.0", "--cidr", "24"]).target().unwrap_err();
        assert!(matches!(err, CliError::Scan(ScanError::InvalidCidr(_))));
    }

    #[tokio::test]
    async fn test_zero_concurrency_rejected_before_scanning() {
        let settings = AppSettings::default();
        let err = command(&["--con", "0"])
            .execute(&settings, false, true)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Scan(ScanError::InvalidConcurrency(0))));
    }

    #[tokio::test]
    async fn test_oversized_subnet_rejected() {
        let settings = AppSettings {
            max_subnet_hosts: 254,
            ..AppSettings::default()
        };
        let err = command(&["--host", "10.0.0.0", "--cidr", "23"])
            .execute(&settings, false, true)
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Other(_)));
    }
}
