//! Configuration for retry and cache behavior.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry configuration for remote fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts, including the first one. Must be at least 1.
    pub max_attempts: u32,
    /// Pause before the second attempt.
    pub initial_backoff: Duration,
    /// Ceiling on any single pause.
    pub max_backoff: Duration,
    /// Growth factor between pauses. 1.0 gives a fixed backoff.
    pub backoff_multiplier: f32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(10),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Fixed backoff: the same pause between every attempt.
    pub fn fixed(max_attempts: u32, pause: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff: pause,
            max_backoff: pause,
            backoff_multiplier: 1.0,
        }
    }

    /// Set the total attempt budget.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the initial backoff.
    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    /// Set the backoff ceiling.
    pub fn with_max_backoff(mut self, backoff: Duration) -> Self {
        self.max_backoff = backoff;
        self
    }

    /// Pause to take after the given 1-based attempt fails.
    ///
    /// Computed as `initial * multiplier^(attempt - 1)`, capped at
    /// `max_backoff`. Never panics: the math runs in f64 and clamps.
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(63) as i32;
        let factor = f64::from(self.backoff_multiplier.max(0.0)).powi(exponent);
        let secs = self.initial_backoff.as_secs_f64() * factor;
        let capped = secs.min(self.max_backoff.as_secs_f64());
        if capped.is_finite() && capped > 0.0 {
            Duration::from_secs_f64(capped)
        } else {
            Duration::ZERO
        }
    }
}

/// Cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a cached snapshot may be served before it counts as
    /// expired. Kept short: the limit can change at the remote side.
    pub entry_ttl: Duration,
    /// Maximum number of entries held before the oldest is evicted.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            entry_ttl: Duration::from_secs(30),
            max_entries: 10_000,
        }
    }
}

impl CacheConfig {
    /// Create a cache config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.entry_ttl = ttl;
        self
    }

    /// Set the entry capacity.
    pub fn with_max_entries(mut self, max: usize) -> Self {
        self.max_entries = max;
        self
    }
}

/// Master configuration for a verification service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WardenConfig {
    pub retry: RetryConfig,
    pub cache: CacheConfig,
}

impl WardenConfig {
    /// Reject configurations that would make the service misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_attempts".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.retry.backoff_multiplier <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.backoff_multiplier".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.cache.entry_ttl.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "cache.entry_ttl".to_string(),
                reason: "must be non-zero".to_string(),
            });
        }
        if self.cache.max_entries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cache.max_entries".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
