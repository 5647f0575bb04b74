//! Cluster state access.
//!
//! # Data Flow
//! ```text
//! Reconciler
//!     → EndpointStore::fetch (read the endpoint resource, resourceVersion included)
//!     → ... probe / diff / mutate ...
//!     → EndpointStore::update (replace guarded by resourceVersion)
//!         → Ok | Conflict (409) | other error
//! ```
//!
//! # Design Decisions
//! - The reconciler only sees the [`EndpointStore`] trait; `client.rs` is the
//!   kube-rs implementation
//! - Conflicts are a distinct variant so the retry policy can act on them alone
//! - NotFound is its own variant for a clear operator message, but it is still fatal

pub mod client;

use std::future::Future;

use k8s_openapi::api::core::v1::Endpoints;
use thiserror::Error;

use crate::resilience::Conflict;

pub use client::KubeEndpointStore;

/// Failures reported by an [`EndpointStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("endpoints {namespace}/{name} not found")]
    NotFound { namespace: String, name: String },

    #[error("endpoints {namespace}/{name} was modified since it was read")]
    Conflict { namespace: String, name: String },

    #[error("Kubernetes API error: {0}")]
    Api(#[from] kube::Error),
}

impl Conflict for StoreError {
    fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

/// Read/update access to endpoint resources in the control plane.
pub trait EndpointStore: Send + Sync {
    /// Fetch the current endpoint resource.
    fn fetch(
        &self,
        namespace: &str,
        name: &str,
    ) -> impl Future<Output = Result<Endpoints, StoreError>> + Send;

    /// Replace the endpoint resource. The write must fail with
    /// [`StoreError::Conflict`] when the stored version moved on since
    /// `endpoints` was fetched.
    fn update(
        &self,
        namespace: &str,
        name: &str,
        endpoints: &Endpoints,
    ) -> impl Future<Output = Result<Endpoints, StoreError>> + Send;
}
