//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the controller.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the endpoint prober.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProbeConfig {
    /// The endpoint resource under management.
    pub target: TargetConfig,

    /// Seconds to wait between reconciliation cycles.
    pub period_secs: u64,

    /// TCP probe settings.
    pub probe: ProbeSettings,

    /// Conflict retry settings for endpoint updates.
    pub retry: RetryConfig,

    /// Liveness endpoint settings.
    pub liveness: LivenessConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ProbeConfig {
    /// Time between the end of one cycle and the start of the next.
    pub fn period(&self) -> Duration {
        Duration::from_secs(self.period_secs)
    }
}

/// Which endpoint resource to reconcile, and which port to probe.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TargetConfig {
    /// Namespace of the endpoint resource.
    pub namespace: String,

    /// Name of the endpoint resource.
    pub endpoint: String,

    /// Port probed on every member address.
    pub port: u16,
}

/// TCP probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// Connection establishment timeout in milliseconds.
    pub connect_timeout_ms: u64,
}

impl ProbeSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 3000,
        }
    }
}

/// How a conflicting endpoint update is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Re-send the payload computed from the original snapshot.
    #[default]
    Resend,
    /// Re-fetch the resource, re-probe and re-diff before each new attempt.
    Recompute,
}

/// Retry configuration for optimistic-concurrency conflicts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of update attempts.
    pub steps: u32,

    /// Delay before the first retry in milliseconds.
    pub initial_delay_ms: u64,

    /// Multiplier applied to the delay after every retry.
    pub factor: f64,

    /// Maximum extra delay as a fraction of the current delay.
    /// e.g., 0.1 adds up to 10%.
    pub jitter: f64,

    /// What to send again after a conflict.
    pub conflict_policy: ConflictPolicy,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            steps: 5,
            initial_delay_ms: 10,
            factor: 1.0,
            jitter: 0.1,
            conflict_policy: ConflictPolicy::Resend,
        }
    }
}

/// Liveness endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LivenessConfig {
    /// Bind address (e.g., "0.0.0.0:80").
    pub bind_address: String,

    /// Route answering liveness checks.
    pub path: String,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:80".to_string(),
            path: "/healthz".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
