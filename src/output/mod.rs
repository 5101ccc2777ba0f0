//! Output formatting module.
//!
//! Provides formatters for plain text, JSON, and CSV output of scan results.
//! Closed ports are dropped from the report unless explicitly requested; the
//! closed total is always reported.

mod csv_format;
mod json_format;
mod plain;

pub use csv_format::write_csv;
pub use json_format::write_json;
pub use plain::{print_error, print_scan_header, print_warning, write_plain};

use crate::scanner::{HostScanResult, PortState, Protocol, SubnetScanResult};
use crate::services::service_name;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable plain text
    #[default]
    Plain,
    /// JSON structured output
    Json,
    /// CSV format for data analysis
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// One port row in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportPort {
    pub port: u16,
    pub protocol: Protocol,
    pub state: PortState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<&'static str>,
}

/// Listed ports for one host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportHost {
    pub host: String,
    pub ports: Vec<ReportPort>,
}

/// A finished scan ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    /// What the user asked to scan (host or CIDR block).
    pub target: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub hosts_scanned: usize,
    pub ports_scanned: usize,
    pub closed_ports: usize,
    /// Hosts with at least one listed port, ascending.
    pub hosts: Vec<ReportHost>,
}

impl ScanReport {
    /// Build a report. Closed ports are listed only if `show_closed`.
    pub fn new(
        target: impl Into<String>,
        started_at: DateTime<Utc>,
        duration: Duration,
        result: &SubnetScanResult,
        show_closed: bool,
    ) -> Self {
        let hosts = result
            .hosts
            .iter()
            .map(|host| report_host(host, show_closed))
            .filter(|host| !host.ports.is_empty())
            .collect();

        Self {
            target: target.into(),
            started_at,
            duration_ms: duration.as_millis() as u64,
            hosts_scanned: result.hosts.len(),
            ports_scanned: result.ports_scanned(),
            closed_ports: result.closed_count,
            hosts,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

fn report_host(host: &HostScanResult, show_closed: bool) -> ReportHost {
    let ports = host
        .ports
        .iter()
        .filter(|r| show_closed || r.is_open())
        .map(|r| ReportPort {
            port: r.port,
            protocol: r.protocol,
            state: r.state,
            service: service_name(r.port, r.protocol),
        })
        .collect();

    ReportHost {
        host: host.host.clone(),
        ports,
    }
}

/// Write `report` to `out` in the requested format.
pub fn write_report<W: Write>(out: &mut W, report: &ScanReport, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Plain => write_plain(out, report),
        OutputFormat::Json => write_json(out, report),
        OutputFormat::Csv => write_csv(out, report),
    }
}

/// Format and print scan results to stdout.
pub fn print_results(report: &ScanReport, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(&mut out, report, format)?;
    out.flush()
}
