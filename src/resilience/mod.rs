//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Endpoint update:
//!     → retries.rs (retry while the control plane reports a conflict)
//!     → backoff.rs (constant-by-default delay with 10% jitter between attempts)
//! ```
//!
//! # Design Decisions
//! - Conflicts are the only recoverable persistence failure
//! - Bounded attempts: an update that keeps conflicting is fatal upstream
//! - Jittered backoff keeps competing writers from retrying in lockstep

pub mod backoff;
pub mod retries;

pub use backoff::Backoff;
pub use retries::{retry_on_conflict, Conflict, RetryError};
