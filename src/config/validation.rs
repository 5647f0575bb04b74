//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that the required target settings are present
//! - Validate value ranges (timeouts > 0, ports valid, jitter in range)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProbeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::ProbeConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending setting.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a fully assembled configuration.
pub fn validate_config(config: &ProbeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.target.namespace.trim().is_empty() {
        errors.push(ValidationError::new("target.namespace", "must be set (CHECK_NAMESPACE)"));
    }
    if config.target.endpoint.trim().is_empty() {
        errors.push(ValidationError::new("target.endpoint", "must be set (CHECK_ENDPOINT)"));
    }
    if config.target.port == 0 {
        errors.push(ValidationError::new(
            "target.port",
            "must be set to a non-zero port (CHECK_PORT)",
        ));
    }
    if config.period_secs == 0 {
        errors.push(ValidationError::new(
            "period_secs",
            "must be a positive number of seconds (PERIOD_SECONDS)",
        ));
    }

    if config.probe.connect_timeout_ms == 0 {
        errors.push(ValidationError::new("probe.connect_timeout_ms", "must be greater than zero"));
    }

    let retry = &config.retry;
    if retry.steps == 0 {
        errors.push(ValidationError::new("retry.steps", "at least one attempt is required"));
    }
    if !retry.factor.is_finite() || retry.factor <= 0.0 {
        errors.push(ValidationError::new(
            "retry.factor",
            "must be a finite number greater than zero",
        ));
    }
    if !(0.0..=1.0).contains(&retry.jitter) {
        errors.push(ValidationError::new("retry.jitter", "must be between 0.0 and 1.0"));
    }

    if !config.liveness.path.starts_with('/') {
        errors.push(ValidationError::new("liveness.path", "must start with '/'"));
    }
    if config.liveness.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new("liveness.bind_address", "not a valid socket address"));
    }

    let observability = &config.observability;
    if observability.metrics_enabled
        && observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "not a valid socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ProbeConfig {
        let mut config = ProbeConfig::default();
        config.target.namespace = "default".into();
        config.target.endpoint = "web".into();
        config.target.port = 8080;
        config.period_secs = 5;
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn test_defaults_miss_every_required_setting() {
        let errors = validate_config(&ProbeConfig::default()).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["target.namespace", "target.endpoint", "target.port", "period_secs"]
        );
    }

    #[test]
    fn test_retry_ranges() {
        let mut config = valid();
        config.retry.steps = 0;
        config.retry.factor = f64::NAN;
        config.retry.jitter = 1.5;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = valid();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "observability.metrics_address");
    }

    #[test]
    fn test_liveness_path_must_be_absolute() {
        let mut config = valid();
        config.liveness.path = "healthz".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].to_string(), "liveness.path: must start with '/'");
    }
}
