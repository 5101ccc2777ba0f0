//! Port-range scanner.
//!
//! Scans an inclusive port interval on one host with a fixed pool of probe
//! workers. Workers pull ports from a bounded job queue, publish results to a
//! bounded result queue, and exit once the job queue is closed and drained.
//! The driver returns only after every port has produced exactly one result.

use crate::error::{ScanError, ScanResult};
use crate::scanner::probe::TcpProber;
use crate::scanner::traits::{HostScanResult, PortState, ProbeResult, Prober};
use crate::types::{Concurrency, PortRange};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::debug;

/// Scans port ranges on a single host with bounded concurrency.
pub struct RangeScanner<P = TcpProber> {
    prober: Arc<P>,
    concurrency: Concurrency,
}

impl<P: Prober + 'static> RangeScanner<P> {
    /// Create a scanner running `concurrency` probe workers per scan.
    pub fn new(prober: P, concurrency: Concurrency) -> Self {
        Self::from_shared(Arc::new(prober), concurrency)
    }

    /// Create a scanner around an already shared prober.
    pub fn from_shared(prober: Arc<P>, concurrency: Concurrency) -> Self {
        Self {
            prober,
            concurrency,
        }
    }

    pub fn concurrency(&self) -> Concurrency {
        self.concurrency
    }

    pub fn prober(&self) -> &Arc<P> {
        &self.prober
    }

    /// Probe every port of `range` on `host`.
    ///
    /// Results are sorted ascending by port. The closed count covers this call
    /// only.
    pub async fn scan(&self, host: &str, range: PortRange) -> ScanResult<HostScanResult> {
        let port_count = range.port_count();
        let workers = self.concurrency.get();
        debug!(host, range = %range, ports = port_count, workers, "scanning port range");

        let host: Arc<str> = Arc::from(host);
        let (job_tx, job_rx) = mpsc::channel::<u16>(port_count);
        let (result_tx, mut result_rx) = mpsc::channel::<ProbeResult>(port_count);
        let job_rx = Arc::new(Mutex::new(job_rx));
        let closed = Arc::new(AtomicUsize::new(0));

        let mut pool = JoinSet::new();
        for _ in 0..workers {
            pool.spawn(probe_worker(
                Arc::clone(&self.prober),
                Arc::clone(&host),
                Arc::clone(&job_rx),
                result_tx.clone(),
                Arc::clone(&closed),
            ));
        }
        // Only workers hold result senders now, so the queue closes when the
        // last worker exits.
        drop(result_tx);

        for port in range.iter() {
            // Capacity equals the job count, so this never waits. It only
            // fails if every worker is gone, which the count check reports.
            if job_tx.send(port).await.is_err() {
                break;
            }
        }
        drop(job_tx);

        let mut ports = Vec::with_capacity(port_count);
        while ports.len() < port_count {
            match result_rx.recv().await {
                Some(result) => ports.push(result),
                None => break,
            }
        }

        while let Some(joined) = pool.join_next().await {
            joined?;
        }

        if ports.len() != port_count {
            return Err(ScanError::IncompleteScan {
                expected: port_count,
                received: ports.len(),
            });
        }

        ports.sort_by_key(|r| r.port);
        let closed_count = closed.load(Ordering::Acquire);
        debug!(
            host = %host,
            open = port_count - closed_count,
            closed = closed_count,
            "port range scan complete"
        );

        Ok(HostScanResult {
            host: host.to_string(),
            ports,
            closed_count,
        })
    }

    /// Derive a scanner sharing this prober but using a different pool size.
    pub fn with_concurrency(&self, concurrency: Concurrency) -> Self {
        Self::from_shared(Arc::clone(&self.prober), concurrency)
    }
}

async fn probe_worker<P: Prober>(
    prober: Arc<P>,
    host: Arc<str>,
    jobs: Arc<Mutex<mpsc::Receiver<u16>>>,
    results: mpsc::Sender<ProbeResult>,
    closed: Arc<AtomicUsize>,
) {
    loop {
        let next = jobs.lock().await.recv().await;
        let Some(port) = next else {
            break;
        };

        let result = prober.probe(&host, port).await;
        if result.state == PortState::Closed {
            closed.fetch_add(1, Ordering::AcqRel);
        }
        if results.send(result).await.is_err() {
            break;
        }
    }
}

/// Scan `start..=end` on `host` with the default TCP prober.
///
/// An `end` of 0 scans `start` alone. Zero concurrency is rejected before any
/// worker is spawned.
pub async fn scan_ports(
    host: &str,
    start: u16,
    end: u16,
    concurrency: usize,
) -> ScanResult<HostScanResult> {
    let concurrency = Concurrency::new(concurrency)?;
    let range = PortRange::from_bounds(start, end)?;
    RangeScanner::new(TcpProber::default(), concurrency)
        .scan(host, range)
        .await
}
