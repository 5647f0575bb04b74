//! Exponential backoff with jitter.

use std::time::Duration;

use rand::Rng;

use crate::config::RetryConfig;

/// Retry schedule: `steps` attempts, sleeping `duration * factor^n` plus
/// up to `jitter * delay` between consecutive attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    pub steps: u32,
    pub duration: Duration,
    pub factor: f64,
    pub jitter: f64,
}

impl Default for Backoff {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for Backoff {
    fn from(config: &RetryConfig) -> Self {
        Self {
            steps: config.steps,
            duration: Duration::from_millis(config.initial_delay_ms),
            factor: config.factor,
            jitter: config.jitter,
        }
    }
}

/// Calculate the delay to wait after the given failed attempt.
///
/// Attempt 0 never waits. With a factor of 1.0 every retry waits the base
/// duration plus jitter.
pub fn calculate_backoff(attempt: u32, backoff: &Backoff) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }

    let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
    let delay_secs = backoff.duration.as_secs_f64() * backoff.factor.powi(exponent);
    let delay = Duration::try_from_secs_f64(delay_secs).unwrap_or(Duration::MAX);

    jittered(delay, backoff.jitter)
}

/// Add a random extra delay of up to `max_factor * delay`.
pub fn jittered(delay: Duration, max_factor: f64) -> Duration {
    if max_factor <= 0.0 || delay.is_zero() {
        return delay;
    }

    let extra = delay.as_secs_f64() * max_factor * rand::thread_rng().gen::<f64>();
    delay.saturating_add(Duration::try_from_secs_f64(extra).unwrap_or(Duration::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule_is_constant() {
        let backoff = Backoff::default();
        assert_eq!(backoff.steps, 5);

        for attempt in 1..backoff.steps {
            let delay = calculate_backoff(attempt, &backoff);
            assert!(delay >= Duration::from_millis(10));
            assert!(delay <= Duration::from_millis(11));
        }
    }

    #[test]
    fn test_backoff_calculation() {
        let backoff = Backoff {
            steps: 10,
            duration: Duration::from_millis(100),
            factor: 2.0,
            jitter: 0.0,
        };

        assert_eq!(calculate_backoff(0, &backoff), Duration::ZERO);
        assert_eq!(calculate_backoff(1, &backoff), Duration::from_millis(100));
        assert_eq!(calculate_backoff(2, &backoff), Duration::from_millis(200));
        assert_eq!(calculate_backoff(4, &backoff), Duration::from_millis(800));
    }

    #[test]
    fn test_jitter_bounds() {
        let base = Duration::from_millis(1000);
        for _ in 0..100 {
            let delay = jittered(base, 0.1);
            assert!(delay >= base);
            assert!(delay <= Duration::from_millis(1100));
        }
        assert_eq!(jittered(base, 0.0), base);
    }
}
