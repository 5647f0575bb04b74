//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Config (already validated) → Signal handlers → Metrics exporter
//!     → Liveness listener → Cluster client → Reconciler
//!
//! Shutdown (shutdown.rs):
//!     Signal received → flag set → reconciler exits at the top of its next cycle
//!     → liveness server drains → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM → Trigger graceful shutdown
//!     SIGINT  → Ignored
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then listeners, then the loop
//! - No preemption: an in-flight cycle always completes

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{Shutdown, ShutdownSignal};
pub use signals::Signals;
