//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! Reconciler cycle:
//!     addresses from the current snapshot
//!     → probe.rs: probe_all (one task per address)
//!     → TcpProber: connect (bounded) → immediate read → reachable?
//!     → Vec<ProbeResult> once every task reported
//! ```
//!
//! # Design Decisions
//! - Raw TCP only; no application-layer checks
//! - Each probe is independent and holds no shared mutable state
//! - The prober is a trait so the reconciler can run against scripted outcomes

pub mod probe;

pub use probe::{classify_connected, probe_all, ProbeResult, Prober, TcpProber};
