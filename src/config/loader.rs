//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::config::schema::ProbeConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_NAMESPACE: &str = "CHECK_NAMESPACE";
pub const ENV_ENDPOINT: &str = "CHECK_ENDPOINT";
pub const ENV_PORT: &str = "CHECK_PORT";
pub const ENV_PERIOD: &str = "PERIOD_SECONDS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value {value:?} for {var}: {reason}")]
    Env {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration.
///
/// The optional TOML file provides the base, the process environment
/// overrides the target settings on top of it.
pub fn load_config(path: Option<&Path>) -> Result<ProbeConfig, ConfigError> {
    load_config_with(path, |var| std::env::var(var).ok())
}

/// Same as [`load_config`], reading variables through `lookup`.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<ProbeConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ProbeConfig::default(),
    };

    apply_env(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

fn apply_env<F>(config: &mut ProbeConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(namespace) = lookup(ENV_NAMESPACE) {
        config.target.namespace = namespace;
    }
    if let Some(endpoint) = lookup(ENV_ENDPOINT) {
        config.target.endpoint = endpoint;
    }
    if let Some(port) = lookup(ENV_PORT) {
        config.target.port = parse_var(ENV_PORT, &port)?;
    }
    if let Some(period) = lookup(ENV_PERIOD) {
        config.period_secs = parse_var(ENV_PERIOD, &period)?;
    }
    Ok(())
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Env {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ConflictPolicy;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENV_NAMESPACE, "default"),
            (ENV_ENDPOINT, "web"),
            (ENV_PORT, "8080"),
            (ENV_PERIOD, "5"),
        ]
    }

    #[test]
    fn test_env_only() {
        let config = load_config_with(None, env(&required())).unwrap();
        assert_eq!(config.target.namespace, "default");
        assert_eq!(config.target.endpoint, "web");
        assert_eq!(config.target.port, 8080);
        assert_eq!(config.period_secs, 5);
        assert_eq!(config.probe.connect_timeout_ms, 3000);
        assert_eq!(config.retry.steps, 5);
    }

    #[test]
    fn test_invalid_period_is_fatal() {
        let mut vars = required();
        vars[3] = (ENV_PERIOD, "soon");
        let err = load_config_with(None, env(&vars)).unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: ENV_PERIOD, .. }));
    }

    #[test]
    fn test_missing_settings_are_reported_together() {
        let err = load_config_with(None, env(&[(ENV_NAMESPACE, "default")])).unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_file_then_env_override() {
        let path = std::env::temp_dir().join(format!("probe-ep-{}.toml", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
period_secs = 30

[target]
namespace = "from-file"
endpoint = "web"
port = 9000

[retry]
conflict_policy = "recompute"
jitter = 0.0
"#
        )
        .unwrap();

        let config = load_config_with(Some(&path), env(&[(ENV_NAMESPACE, "from-env")])).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.target.namespace, "from-env");
        assert_eq!(config.target.port, 9000);
        assert_eq!(config.period_secs, 30);
        assert_eq!(config.retry.conflict_policy, ConflictPolicy::Recompute);
        assert_eq!(config.retry.steps, 5);
    }
}
