//! Exponential backoff between retryable attempts
//!
//! `delay(attempt) = unit * base^attempt`, optionally capped at `max_delay`.
//! With the defaults (`unit = 1s`, `base = 2`) the sequence for attempts
//! 0, 1, 2, ... is 1s, 2s, 4s, ...
//!
//! The policy is a pure value: it holds no attempt counter and never sleeps.
//! Callers own the loop and decide when a failure is retryable.

use std::time::Duration;

use thiserror::Error;

/// Default delay unit (the delay of attempt 0)
pub const DEFAULT_UNIT: Duration = Duration::from_secs(1);

/// Default growth factor
pub const DEFAULT_BASE: f64 = 2.0;

/// Default ceiling for a single delay
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

/// Errors raised when building a [`RetryPolicy`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackoffError {
    #[error("Invalid backoff configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Exponential backoff policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    unit: Duration,
    base: f64,
    max_delay: Option<Duration>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { unit: DEFAULT_UNIT, base: DEFAULT_BASE, max_delay: Some(DEFAULT_MAX_DELAY) }
    }
}

impl RetryPolicy {
    /// Start a builder from the defaults
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::new()
    }

    /// Backoff delay before the retry that follows `attempt` (zero-indexed)
    pub fn delay(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let raw_secs = self.unit.as_secs_f64() * self.base.powi(exponent);

        let delay = if raw_secs.is_finite() {
            Duration::try_from_secs_f64(raw_secs).unwrap_or(Duration::MAX)
        } else {
            Duration::MAX
        };

        match self.max_delay {
            Some(cap) => delay.min(cap),
            None => delay,
        }
    }

    /// Delay unit multiplied by `base^attempt`
    pub fn unit(&self) -> Duration {
        self.unit
    }

    /// Exponential base
    pub fn base(&self) -> f64 {
        self.base
    }

    /// Ceiling for a single delay, if any
    pub fn max_delay(&self) -> Option<Duration> {
        self.max_delay
    }

    fn validate(&self) -> Result<(), BackoffError> {
        if !self.base.is_finite() || self.base < 1.0 {
            return Err(BackoffError::InvalidConfiguration {
                message: format!("base must be a finite number >= 1, got {}", self.base),
            });
        }
        if self.unit.is_zero() {
            return Err(BackoffError::InvalidConfiguration {
                message: "unit must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Builder for [`RetryPolicy`] with fluent API
#[derive(Debug, Default)]
pub struct RetryPolicyBuilder {
    policy: RetryPolicy,
}

impl RetryPolicyBuilder {
    /// Start from the default policy (1s unit, base 2, 30s cap)
    pub fn new() -> Self {
        Self { policy: RetryPolicy::default() }
    }

    /// Set the delay unit
    pub fn unit(mut self, unit: Duration) -> Self {
        self.policy.unit = unit;
        self
    }

    /// Set the exponential base; must be finite and at least 1
    pub fn base(mut self, base: f64) -> Self {
        self.policy.base = base;
        self
    }

    /// Cap every delay at `max_delay`
    pub fn max_delay(mut self, max_delay: Duration) -> Self {
        self.policy.max_delay = Some(max_delay);
        self
    }

    /// Let delays grow without a ceiling
    pub fn uncapped(mut self) -> Self {
        self.policy.max_delay = None;
        self
    }

    /// Validate and return the policy.
    ///
    /// # Errors
    /// `BackoffError::InvalidConfiguration` for a non-finite or sub-1 base, or a zero unit.
    pub fn build(self) -> Result<RetryPolicy, BackoffError> {
        self.policy.validate()?;
        Ok(self.policy)
    }
}
