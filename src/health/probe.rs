//! Active TCP probing.
//!
//! # Responsibilities
//! - Connect to one member address with a bounded timeout
//! - Distinguish a serving backend from one that accepts and immediately closes
//! - Fan probes out over every address of a cycle and wait for all of them
//!
//! # Design Decisions
//! - Probe failures are outcomes, never errors
//! - Only an explicit end-of-stream on the immediate read marks a connected
//!   backend unreachable; pending data, no data, or read errors all count as reachable
//! - One task per address, no extra throttling; the fan-in is a full barrier

use std::future::Future;
use std::io::Read;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::net::TcpStream;
use tokio::task::{JoinError, JoinSet};
use tokio::time;

use crate::observability::metrics;

/// Outcome of probing one address during one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub ip: String,
    pub reachable: bool,
}

impl ProbeResult {
    pub fn new(ip: impl Into<String>, reachable: bool) -> Self {
        Self {
            ip: ip.into(),
            reachable,
        }
    }
}

/// Classifies a single address as reachable or not.
pub trait Prober: Send + Sync + 'static {
    fn probe(&self, ip: &str) -> impl Future<Output = bool> + Send;
}

/// Raw TCP connect-and-read prober against a fixed port.
#[derive(Debug, Clone)]
pub struct TcpProber {
    port: u16,
    connect_timeout: Duration,
}

impl TcpProber {
    pub fn new(port: u16, connect_timeout: Duration) -> Self {
        Self {
            port,
            connect_timeout,
        }
    }
}

impl Prober for TcpProber {
    async fn probe(&self, ip: &str) -> bool {
        let started = Instant::now();

        let connect = TcpStream::connect((ip, self.port));
        let reachable = match time::timeout(self.connect_timeout, connect).await {
            Ok(Ok(stream)) => classify_connected(stream),
            Ok(Err(e)) => {
                tracing::debug!(ip, port = self.port, error = %e, "Probe failed: connection error");
                false
            }
            Err(_) => {
                tracing::debug!(ip, port = self.port, "Probe failed: timeout");
                false
            }
        };

        metrics::record_probe(reachable, started.elapsed());
        reachable
    }
}

/// Classify an established connection with one non-blocking read, then close it.
///
/// End-of-stream means the peer accepted and hung up without serving; any
/// other outcome (would block, data, read error) is reachable.
pub fn classify_connected(stream: TcpStream) -> bool {
    // into_std keeps the socket non-blocking, so the read returns immediately
    let mut stream = match stream.into_std() {
        Ok(stream) => stream,
        Err(_) => return true,
    };

    let mut buf = [0u8; 1];
    !matches!(stream.read(&mut buf), Ok(0))
}

/// Probe every address concurrently and collect exactly one result each.
///
/// Results come back in completion order. A panicking probe task fails the
/// whole batch rather than leaving a hole in it.
pub async fn probe_all<P, I>(prober: &Arc<P>, addresses: I) -> Result<Vec<ProbeResult>, JoinError>
where
    P: Prober,
    I: IntoIterator<Item = String>,
{
    let mut tasks = JoinSet::new();
    for ip in addresses {
        let prober = Arc::clone(prober);
        tasks.spawn(async move {
            let reachable = prober.probe(&ip).await;
            ProbeResult { ip, reachable }
        });
    }

    let mut results = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        results.push(joined?);
    }
    Ok(results)
}
