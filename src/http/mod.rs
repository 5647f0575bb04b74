//! HTTP surface of the controller.
//!
//! # Data Flow
//! ```text
//! Process manager liveness check
//!     → GET /healthz
//!     → server.rs → "OK"
//! ```

pub mod server;

pub use server::LivenessServer;
