use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The two upstream conditions that are expected to clear up after waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransientKind {
    RateLimit,
    Overload,
}

impl fmt::Display for TransientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransientKind::RateLimit => write!(f, "rate limited"),
            TransientKind::Overload => write!(f, "overloaded"),
        }
    }
}

/// Retry decision for a single failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Transient(TransientKind),
    Fatal,
}

/// Why a call produced no usable result.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Failure {
    /// Non-retryable upstream error (bad credentials, malformed request, ...).
    #[error("fatal error: {message}")]
    Fatal { message: String },

    /// The upstream stayed rate limited or overloaded for the whole budget.
    #[error("gave up after {attempts} attempts (last: {last})")]
    RetriesExhausted { attempts: u32, last: TransientKind },

    /// The upstream answered, but not with the structure that was asked for.
    #[error("malformed payload: {message}")]
    MalformedPayload { message: String },
}

/// The result of one resilient call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    Success(String),
    Failure(Failure),
}

impl GenerationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationOutcome::Success(_))
    }

    pub fn into_result(self) -> Result<String, Failure> {
        match self {
            GenerationOutcome::Success(text) => Ok(text),
            GenerationOutcome::Failure(failure) => Err(failure),
        }
    }
}

/// Configuration for retry behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total number of attempts a call may make. Zero is treated as one.
    pub max_retries: u32,
    /// Base delay in milliseconds for exponential backoff.
    pub base_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            base_delay_ms: 10_000,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay_ms: u64::try_from(base_delay.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Attempts actually allowed for one call.
    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    /// Wait after the failed attempt `attempt` (0-based):
    /// delay = base_delay_ms * 2^attempt
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_backoff_from_attempt_zero() {
        let policy = RetryPolicy {
            max_retries: 5,
            base_delay_ms: 2000,
        };
        assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(2));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(4));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(8));
        assert_eq!(policy.delay_for_attempt(3), Duration::from_secs(16));
    }

    #[test]
    fn huge_attempt_saturates() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.delay_for_attempt(200),
            Duration::from_millis(u64::MAX)
        );
    }

    #[test]
    fn oversized_base_delay_saturates() {
        let policy = RetryPolicy::new(3, Duration::MAX);
        assert_eq!(policy.base_delay_ms, u64::MAX);
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn zero_budget_still_allows_one_attempt() {
        let policy = RetryPolicy::new(0, Duration::from_secs(1));
        assert_eq!(policy.attempts(), 1);
        assert_eq!(policy.base_delay_ms, 1000);
    }

    #[test]
    fn default_matches_blog_generator_values() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 5);
        assert_eq!(policy.base_delay_ms, 10_000);
    }

    #[test]
    fn failure_display() {
        let exhausted = Failure::RetriesExhausted {
            attempts: 5,
            last: TransientKind::Overload,
        };
        assert_eq!(exhausted.to_string(), "gave up after 5 attempts (last: overloaded)");

        let fatal = Failure::Fatal {
            message: "API key not valid".into(),
        };
        assert_eq!(fatal.to_string(), "fatal error: API key not valid");
    }

    #[test]
    fn failure_serializes_with_kind_tag() {
        let failure = Failure::MalformedPayload {
            message: "expected value".into(),
        };
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["kind"], "malformed_payload");
        assert_eq!(json["message"], "expected value");
    }

    #[test]
    fn outcome_into_result() {
        assert_eq!(
            GenerationOutcome::Success("hi".into()).into_result(),
            Ok("hi".to_string())
        );
        let failed = GenerationOutcome::Failure(Failure::Fatal {
            message: "nope".into(),
        });
        assert!(!failed.is_success());
        assert!(failed.into_result().is_err());
    }
}
