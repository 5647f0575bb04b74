//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overlay (CHECK_NAMESPACE, CHECK_ENDPOINT, CHECK_PORT, PERIOD_SECONDS)
//!     → validation.rs (semantic checks)
//!     → ProbeConfig (validated, immutable)
//!     → passed by reference into the reconciler and startup
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; there is no reload
//! - All fields have defaults so the environment alone is a complete config
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ConflictPolicy;
pub use schema::LivenessConfig;
pub use schema::LogFormat;
pub use schema::ObservabilityConfig;
pub use schema::ProbeConfig;
pub use schema::RetryConfig;
