//! CSV output formatting.

use super::ScanReport;
use std::io::{self, Write};

/// Write one row per listed port.
pub fn write_csv<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["host", "port", "protocol", "state", "service"])?;

    for host in &report.hosts {
        for port in &host.ports {
            wtr.write_record([
                host.host.as_str(),
                port.port.to_string().as_str(),
                port.protocol.as_str(),
                port.state.to_string().as_str(),
                port.service.unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
