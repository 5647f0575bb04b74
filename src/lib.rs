//! Endpoint reachability reconciler library.

pub mod cluster;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod reconcile;
pub mod resilience;

pub use config::schema::ProbeConfig;
pub use error::{Error, Result};
pub use lifecycle::Shutdown;
pub use reconcile::Reconciler;
