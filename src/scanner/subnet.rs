//! Subnet scanner.
//!
//! Fans a port-range scan out across every usable host of an IPv4 block. A
//! fixed pool of host workers pulls addresses from a bounded job queue and
//! runs one [`RangeScanner`] scan per host, each with its own probe pool.
//!
//! With the default policy both pools share the same size, so up to
//! `concurrency²` connects can be in flight at once. Use
//! [`SubnetScanner::with_port_concurrency`] to bound the two levels
//! separately.

use crate::error::{ScanError, ScanResult};
use crate::scanner::probe::TcpProber;
use crate::scanner::range::RangeScanner;
use crate::scanner::traits::{HostScanResult, Prober, SubnetScanResult};
use crate::types::{Concurrency, PortRange, Subnet};
use indicatif::ProgressBar;
use std::net::Ipv4Addr;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Largest queue tokio's bounded channel accepts.
const MAX_QUEUE_CAPACITY: usize = usize::MAX >> 3;

type HostOutcome = (Ipv4Addr, ScanResult<HostScanResult>);

/// Scans a port range on every usable host of a subnet.
pub struct SubnetScanner<P = TcpProber> {
    ranges: Arc<RangeScanner<P>>,
    host_concurrency: Concurrency,
    progress: Option<ProgressBar>,
}

impl<P: Prober + 'static> SubnetScanner<P> {
    /// Create a scanner where both the host pool and every per-host probe
    /// pool have `concurrency` workers.
    pub fn new(prober: P, concurrency: Concurrency) -> Self {
        Self {
            ranges: Arc::new(RangeScanner::new(prober, concurrency)),
            host_concurrency: concurrency,
            progress: None,
        }
    }

    /// Bound each host's probe pool independently of the host pool.
    pub fn with_port_concurrency(mut self, port_concurrency: Concurrency) -> Self {
        self.ranges = Arc::new(self.ranges.with_concurrency(port_concurrency));
        self
    }

    /// Advance `progress` once per finished host.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn host_concurrency(&self) -> Concurrency {
        self.host_concurrency
    }

    pub fn port_concurrency(&self) -> Concurrency {
        self.ranges.concurrency()
    }

    /// Scan `range` on every usable host of `subnet`.
    ///
    /// Hosts come back sorted by numeric address; a per-host failure aborts
    /// the whole scan.
    pub async fn scan(&self, subnet: &Subnet, range: PortRange) -> ScanResult<SubnetScanResult> {
        let expected = subnet.usable_host_count();
        info!(
            subnet = %subnet,
            hosts = expected,
            ports = range.port_count(),
            host_workers = self.host_concurrency.get(),
            port_workers = self.port_concurrency().get(),
            "starting subnet scan"
        );

        let capacity = usize::try_from(expected)
            .unwrap_or(MAX_QUEUE_CAPACITY)
            .clamp(1, MAX_QUEUE_CAPACITY);
        let (job_tx, job_rx) = mpsc::channel::<Ipv4Addr>(capacity);
        let (result_tx, mut result_rx) = mpsc::channel::<HostOutcome>(capacity);
        let job_rx = Arc::new(Mutex::new(job_rx));

        let mut pool = JoinSet::new();
        for _ in 0..self.host_concurrency.get() {
            pool.spawn(host_worker(
                Arc::clone(&self.ranges),
                range,
                Arc::clone(&job_rx),
                result_tx.clone(),
                self.progress.clone(),
            ));
        }
        drop(result_tx);

        let mut submitted = 0usize;
        for host in subnet.hosts() {
            if job_tx.send(host).await.is_err() {
                break;
            }
            submitted += 1;
        }
        drop(job_tx);
        debug!(subnet = %subnet, submitted, "all hosts queued");

        let mut hosts = Vec::with_capacity(submitted);
        while hosts.len() < submitted {
            match result_rx.recv().await {
                Some((addr, outcome)) => hosts.push((addr, outcome?)),
                None => break,
            }
        }

        while let Some(joined) = pool.join_next().await {
            joined?;
        }

        if hosts.len() != submitted {
            return Err(ScanError::IncompleteScan {
                expected: submitted,
                received: hosts.len(),
            });
        }

        hosts.sort_by_key(|(addr, _)| u32::from(*addr));
        let hosts: Vec<HostScanResult> = hosts.into_iter().map(|(_, host)| host).collect();
        let closed_count = hosts.iter().map(|h| h.closed_count).sum();

        info!(subnet = %subnet, hosts = hosts.len(), closed = closed_count, "subnet scan complete");
        Ok(SubnetScanResult {
            hosts,
            closed_count,
        })
    }
}

async fn host_worker<P: Prober + 'static>(
    ranges: Arc<RangeScanner<P>>,
    range: PortRange,
    jobs: Arc<Mutex<mpsc::Receiver<Ipv4Addr>>>,
    results: mpsc::Sender<HostOutcome>,
    progress: Option<ProgressBar>,
) {
    loop {
        let next = jobs.lock().await.recv().await;
        let Some(addr) = next else {
            break;
        };

        let outcome = ranges.scan(&addr.to_string(), range).await;
        if let Some(ref pb) = progress {
            pb.inc(1);
            if let Ok(ref host) = outcome {
                let open = host.open_count();
                if open > 0 {
                    pb.set_message(format!("{} open on {}", open, addr));
                }
            }
        }

        if results.send((addr, outcome)).await.is_err() {
            break;
        }
    }
}

/// Scan `start..=end` on every usable host of `host/cidr_suffix` with the
/// default TCP prober, using `concurrency` for both pool levels.
///
/// A non-IPv4 `host` or a suffix above 32 is an invalid CIDR and nothing is
/// scanned.
pub async fn scan_subnet(
    host: &str,
    cidr_suffix: u8,
    start: u16,
    end: u16,
    concurrency: usize,
) -> ScanResult<SubnetScanResult> {
    let base: Ipv4Addr = host
        .trim()
        .parse()
        .map_err(|_| ScanError::InvalidCidr(format!("{}/{}", host, cidr_suffix)))?;
    let subnet = Subnet::new(base, cidr_suffix)?;
    let concurrency = Concurrency::new(concurrency)?;
    let range = PortRange::from_bounds(start, end)?;

    SubnetScanner::new(TcpProber::default(), concurrency)
        .scan(&subnet, range)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::mock::MockProber;
    use tokio::net::TcpListener;

    fn range(start: u16, end: u16) -> PortRange {
        PortRange::from_bounds(start, end).unwrap()
    }

    fn workers(n: usize) -> Concurrency {
        Concurrency::new(n).unwrap()
    }

    fn host_names(result: &SubnetScanResult) -> Vec<&str> {
        result.hosts.iter().map(|h| h.host.as_str()).collect()
    }

    #[tokio::test]
    async fn test_slash_30_scans_two_hosts() {
        let scanner = SubnetScanner::new(MockProber::new(|_, _| false), workers(4));
        let subnet = Subnet::parse("192.168.5.0", "30").unwrap();
        let result = scanner.scan(&subnet, range(80, 81)).await.unwrap();

        assert_eq!(host_names(&result), vec!["192.168.5.1", "192.168.5.2"]);
        assert_eq!(result.closed_count, 4);
    }

    #[tokio::test]
    async fn test_slash_32_scans_one_host() {
        let scanner = SubnetScanner::new(MockProber::new(|_, _| true), workers(4));
        let subnet = Subnet::parse("10.1.2.3", "32").unwrap();
        let result = scanner.scan(&subnet, range(22, 0)).await.unwrap();

        assert_eq!(host_names(&result), vec!["10.1.2.3"]);
        assert_eq!(result.closed_count, 0);
        assert!(result.hosts[0].ports[0].is_open());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_hosts_sorted_numerically() {
        let scanner = SubnetScanner::new(MockProber::jittered(|_, _| false, 3), workers(8));
        let subnet = Subnet::parse("10.0.0.0", "28").unwrap();
        let result = scanner.scan(&subnet, range(1, 4)).await.unwrap();

        let names = host_names(&result);
        assert_eq!(names.len(), 14);
        let nine = names.iter().position(|h| *h == "10.0.0.9").unwrap();
        let ten = names.iter().position(|h| *h == "10.0.0.10").unwrap();
        assert!(nine < ten);

        let addrs: Vec<Ipv4Addr> = names.iter().map(|h| h.parse().unwrap()).collect();
        assert!(addrs.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_closed_count_summed_over_hosts() {
        // Only .2 has anything listening, on port 443.
        let open = |host: &str, port: u16| host == "172.16.0.2" && port == 443;
        let scanner = SubnetScanner::new(MockProber::jittered(open, 2), workers(3));
        let subnet = Subnet::parse("172.16.0.0", "29").unwrap();
        let result = scanner.scan(&subnet, range(440, 449)).await.unwrap();

        assert_eq!(result.hosts.len(), 6);
        assert_eq!(result.ports_scanned(), 60);
        assert_eq!(result.closed_count, 59);
        let per_host: usize = result.hosts.iter().map(|h| h.closed_count).sum();
        assert_eq!(per_host, result.closed_count);

        let open_hosts: Vec<&str> = result
            .hosts
            .iter()
            .filter(|h| h.open_count() > 0)
            .map(|h| h.host.as_str())
            .collect();
        assert_eq!(open_hosts, vec!["172.16.0.2"]);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_independent_pool_sizes_bound_in_flight() {
        let prober = MockProber::jittered(|_, _| false, 3);
        let scanner = SubnetScanner::new(prober, workers(2)).with_port_concurrency(workers(3));
        assert_eq!(scanner.host_concurrency().get(), 2);
        assert_eq!(scanner.port_concurrency().get(), 3);

        let subnet = Subnet::parse("10.9.0.0", "29").unwrap();
        scanner.scan(&subnet, range(1, 20)).await.unwrap();

        let prober = scanner.ranges.prober();
        assert_eq!(prober.calls(), 6 * 20);
        assert!(prober.peak_in_flight() <= 2 * 3);
    }

    #[tokio::test]
    async fn test_host_failure_aborts_scan() {
        let scanner = SubnetScanner::new(MockProber::panicking_on(2), workers(2));
        let subnet = Subnet::parse("10.0.0.0", "30").unwrap();
        let err = scanner.scan(&subnet, range(1, 3)).await.unwrap_err();
        assert!(matches!(err, ScanError::WorkerFailed(_)));
    }

    #[tokio::test]
    async fn test_scan_subnet_rejects_bad_cidr() {
        let err = scan_subnet("10.0.0.0", 33, 80, 0, 4).await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidCidr(_)));

        let err = scan_subnet("example.com", 24, 80, 0, 4).await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidCidr(_)));
    }

    #[tokio::test]
    async fn test_scan_subnet_rejects_zero_concurrency() {
        let err = scan_subnet("10.0.0.0", 30, 80, 0, 0).await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidConcurrency(0)));
    }

    #[tokio::test]
    async fn test_scan_subnet_localhost() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let result = scan_subnet("127.0.0.1", 32, port, 0, 2).await.unwrap();
        assert_eq!(host_names(&result), vec!["127.0.0.1"]);
        assert_eq!(result.closed_count, 0);
        assert_eq!(result.hosts[0].open_count(), 1);
    }
}
