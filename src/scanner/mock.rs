//! In-memory prober for exercising the worker pools without sockets.

use crate::scanner::traits::{PortState, ProbeResult, Prober, Protocol};
use async_trait::async_trait;
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

type OpenFn = Box<dyn Fn(&str, u16) -> bool + Send + Sync>;

pub(crate) struct MockProber {
    is_open: OpenFn,
    max_delay_ms: u64,
    panic_on: Option<u16>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl MockProber {
    /// Answers immediately.
    pub(crate) fn new(is_open: impl Fn(&str, u16) -> bool + Send + Sync + 'static) -> Self {
        Self::jittered(is_open, 0)
    }

    /// Sleeps a random 0..=`max_delay_ms` per probe so completion order is
    /// shuffled.
    pub(crate) fn jittered(
        is_open: impl Fn(&str, u16) -> bool + Send + Sync + 'static,
        max_delay_ms: u64,
    ) -> Self {
        Self {
            is_open: Box::new(is_open),
            max_delay_ms,
            panic_on: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub(crate) fn panicking_on(port: u16) -> Self {
        Self {
            panic_on: Some(port),
            ..Self::new(|_, _| false)
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of probes observed running at once.
    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Prober for MockProber {
    fn protocol(&self) -> Protocol {
        Protocol::Tcp
    }

    async fn probe(&self, host: &str, port: u16) -> ProbeResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.panic_on == Some(port) {
            panic!("mock prober asked to fail on port {}", port);
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let delay = if self.max_delay_ms == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=self.max_delay_ms)
        };
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        } else {
            tokio::task::yield_now().await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let state = if (self.is_open)(host, port) {
            PortState::Open
        } else {
            PortState::Closed
        };
        ProbeResult::new(host, port, self.protocol(), state)
    }
}
