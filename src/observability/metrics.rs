//! Metrics collection and exposition.
//!
//! # Metrics
//! - `probe_ep_cycles_total` (counter): reconciliation cycles by outcome
//! - `probe_ep_address_transitions_total` (counter): addresses moved, by direction
//! - `probe_ep_update_conflicts_total` (counter): endpoint writes rejected as conflicts
//! - `probe_ep_probe_duration_seconds` (histogram): TCP probe latency by result
//! - `probe_ep_ready_addresses` / `probe_ep_not_ready_addresses` (gauge): pool sizes
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Duration;

use std::net::AddrParseError;

use ::metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use thiserror::Error;

/// Why the exporter could not be started.
#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("invalid metrics address {address:?}: {source}")]
    Address {
        address: String,
        source: AddrParseError,
    },

    #[error("failed to install Prometheus exporter: {0}")]
    Install(#[from] BuildError),
}

/// Start the Prometheus exporter on its own listener.
pub fn init_metrics(address: &str) -> Result<SocketAddr, MetricsError> {
    let addr: SocketAddr = address.parse().map_err(|source| MetricsError::Address {
        address: address.to_string(),
        source,
    })?;

    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(addr)
}

pub fn record_cycle(outcome: &'static str) {
    counter!("probe_ep_cycles_total", "outcome" => outcome).increment(1);
}

pub fn record_transition(direction: &'static str) {
    counter!("probe_ep_address_transitions_total", "direction" => direction).increment(1);
}

pub fn record_conflict() {
    counter!("probe_ep_update_conflicts_total").increment(1);
}

pub fn record_probe(reachable: bool, elapsed: Duration) {
    let result = if reachable { "reachable" } else { "unreachable" };
    histogram!("probe_ep_probe_duration_seconds", "result" => result).record(elapsed.as_secs_f64());
}

pub fn record_pool_sizes(ready: usize, not_ready: usize) {
    gauge!("probe_ep_ready_addresses").set(ready as f64);
    gauge!("probe_ep_not_ready_addresses").set(not_ready as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_metrics_rejects_bad_address() {
        let err = init_metrics("not-an-address").unwrap_err();
        assert!(matches!(
            err,
            MetricsError::Address { ref address, .. } if address == "not-an-address"
        ));
    }
}
