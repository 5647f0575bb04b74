//! Endpoint membership model.
//!
//! # Data Flow
//! ```text
//! EndpointSubset (fetched this cycle)
//!     → pool.rs: AddressPool::from_subset
//!     → AddressPool::classification (ip → ready?)
//!     → diff.rs: diff(classification, probe batch) → Vec<Mutation>
//!     → AddressPool::apply (disable / enable)
//!     → AddressPool::write_into (back into the subset for persisting)
//! ```
//!
//! # Design Decisions
//! - Pure in-memory operations; nothing here talks to the cluster
//! - An address lives in exactly one pool at a time
//! - The differ refuses partial, stale, or duplicated probe batches

pub mod diff;
pub mod pool;

pub use diff::{diff, Classification, Diff, DiffError, Mutation};
pub use pool::AddressPool;
