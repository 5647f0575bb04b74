//! Central error types for the endpoint prober.
//!
//! Only the reconciler and startup code construct these; `main` turns any of
//! them into a logged, non-zero process exit.

use thiserror::Error;

use crate::cluster::StoreError;
use crate::config::ConfigError;
use crate::endpoints::DiffError;
use crate::observability::metrics::MetricsError;
use crate::resilience::Conflict;

/// Central error type for the controller.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing settings at startup.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The resource holds more subsets than the single one this controller manages.
    #[error("Error: endpoints {namespace}/{name} has {subsets} subsets, expected at most one")]
    Topology {
        namespace: String,
        name: String,
        subsets: usize,
    },

    /// Reading or writing the endpoint resource failed.
    #[error("Cluster state error: {0}")]
    Store(#[from] StoreError),

    /// Every update attempt conflicted with a concurrent writer.
    #[error("Endpoint update gave up after {attempts} conflicting attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<Error> },

    /// The probe batch does not match the snapshot it was taken for.
    #[error("Incomplete probe batch: {0}")]
    ProbeBatch(#[from] DiffError),

    /// A probe task panicked or was cancelled before reporting.
    #[error("Probe task failed: {0}")]
    ProbeTask(#[from] tokio::task::JoinError),

    /// The metrics exporter was enabled but could not start.
    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),

    /// Kubernetes client construction error.
    #[error("Kubernetes client error: {0}")]
    Kube(#[from] kube::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for controller operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Conflict for Error {
    fn is_conflict(&self) -> bool {
        matches!(self, Error::Store(e) if e.is_conflict())
    }
}
