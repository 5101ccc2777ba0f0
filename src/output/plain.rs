//! Plain text output formatting.
//!
//! Produces human-readable output with colors when writing to a terminal.

use super::ScanReport;
use crate::scanner::PortState;
use console::{style, Style};
use std::io::{self, Write};

/// Write results in human-readable plain text format.
///
/// Hosts with nothing to list are skipped entirely.
pub fn write_plain<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    writeln!(out, "{}", style("Finished.").green().bold())?;
    writeln!(
        out,
        "Scan finished in {}",
        style(format!("{:.2?}", report.duration())).bold()
    )?;
    writeln!(
        out,
        "There are {} closed ports",
        style(report.closed_ports).red()
    )?;

    for host in &report.hosts {
        writeln!(out, "{}", style(&host.host).cyan().bold())?;

        for port in &host.ports {
            let state_style = match port.state {
                PortState::Open => Style::new().green().bold(),
                PortState::Closed => Style::new().red(),
            };

            let row = format!("{:>5}/{}", port.port, port.protocol);
            match port.service {
                Some(service) => writeln!(
                    out,
                    "{} {} {}",
                    row,
                    state_style.apply_to(port.state),
                    service
                )?,
                None => writeln!(out, "{} {}", row, state_style.apply_to(port.state))?,
            }
        }
    }

    Ok(())
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(target: &str, hosts: u64, ports: usize, workers: usize) {
    eprintln!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("portsweep").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    eprintln!(
        "{} Target: {} ({} host{})",
        style("•").dim(),
        style(target).white().bold(),
        hosts,
        if hosts == 1 { "" } else { "s" }
    );
    eprintln!(
        "{} Scanning {} port{} per host with {} workers...",
        style("•").dim(),
        style(ports).white().bold(),
        if ports == 1 { "" } else { "s" },
        workers
    );
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::tests::sample_report;

    fn render(show_closed: bool) -> String {
        console::set_colors_enabled(false);
        let mut buf = Vec::new();
        write_plain(&mut buf, &sample_report(show_closed)).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_open_ports_only() {
        let text = render(false);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Finished.");
        assert_eq!(lines[1], "Scan finished in 1.50s");
        assert_eq!(lines[2], "There are 4 closed ports");
        assert_eq!(lines[3], "10.0.0.1");
        assert_eq!(lines[4], "   22/tcp open ssh");
        assert_eq!(lines[5], "   80/tcp open http");
        assert_eq!(lines.len(), 6);
        assert!(!text.contains("10.0.0.2"));
    }

    #[test]
    fn test_show_closed_lists_every_port() {
        let text = render(true);
        assert!(text.contains("   21/tcp closed ftp"));
        assert!(text.contains("10.0.0.2"));
    }
}
