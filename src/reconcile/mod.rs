//! Reconciliation subsystem.
//!
//! # State Machine
//! ```text
//! Idle ──tick──▶ Probing ──changes──▶ Committing ──ok──▶ Idle
//!                   │                     │
//!                   └──no changes──▶ Idle └──retries exhausted / error──▶ fatal
//! ```
//!
//! # Design Decisions
//! - Strictly sequential: a cycle, including its retries, finishes before the next starts
//! - State is fetched fresh every cycle; nothing is cached across cycles
//! - Fatal-vs-recoverable is decided here and nowhere below

pub mod reconciler;

pub use reconciler::{CycleOutcome, Phase, Reconciler};
