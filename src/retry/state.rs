use std::fmt;
use std::time::Duration;

use super::policy::{ErrorClass, Failure, GenerationOutcome, RetryPolicy, TransientKind};

/// The three states of a resilient call.
///
/// Each call flows through: ATTEMPTING → (BACKOFF → ATTEMPTING)* → RESOLVED
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallState {
    /// About to issue attempt number `attempt` (0-based).
    Attempting { attempt: u32 },
    /// Attempt `attempt` failed transiently; wait before the next one.
    Backoff {
        attempt: u32,
        wait: Duration,
        kind: TransientKind,
    },
    /// Terminal.
    Resolved(GenerationOutcome),
}

impl fmt::Display for CallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallState::Attempting { attempt } => write!(f, "ATTEMPTING({attempt})"),
            CallState::Backoff { wait, .. } => write!(f, "BACKOFF({}ms)", wait.as_millis()),
            CallState::Resolved(GenerationOutcome::Success(_)) => write!(f, "RESOLVED(success)"),
            CallState::Resolved(GenerationOutcome::Failure(_)) => write!(f, "RESOLVED(failure)"),
        }
    }
}

/// What happened while the machine was in its current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallEvent {
    /// The endpoint answered with text.
    Responded(String),
    /// The endpoint failed.
    Errored { class: ErrorClass, message: String },
    /// The backoff wait elapsed.
    Waited,
}

impl CallState {
    pub fn start() -> Self {
        CallState::Attempting { attempt: 0 }
    }

    /// Compute the next state for the given event.
    ///
    /// - In `Attempting`, a response resolves with success; a fatal error
    ///   resolves with `Fatal`; a transient error backs off if budget remains,
    ///   otherwise resolves with `RetriesExhausted`.
    /// - In `Backoff`, `Waited` moves to the next attempt.
    /// - `Resolved` is terminal. Events that do not belong to the current
    ///   state leave it unchanged.
    pub fn next(self, event: CallEvent, policy: &RetryPolicy) -> CallState {
        match (self, event) {
            (CallState::Attempting { .. }, CallEvent::Responded(text)) => {
                CallState::Resolved(GenerationOutcome::Success(text))
            }
            (CallState::Attempting { .. }, CallEvent::Errored { class: ErrorClass::Fatal, message }) => {
                CallState::Resolved(GenerationOutcome::Failure(Failure::Fatal { message }))
            }
            (
                CallState::Attempting { attempt },
                CallEvent::Errored {
                    class: ErrorClass::Transient(kind),
                    ..
                },
            ) => {
                if attempt + 1 < policy.attempts() {
                    CallState::Backoff {
                        attempt,
                        wait: policy.delay_for_attempt(attempt),
                        kind,
                    }
                } else {
                    CallState::Resolved(GenerationOutcome::Failure(Failure::RetriesExhausted {
                        attempts: attempt + 1,
                        last: kind,
                    }))
                }
            }
            (CallState::Backoff { attempt, .. }, CallEvent::Waited) => {
                CallState::Attempting {
                    attempt: attempt + 1,
                }
            }
            (state, _) => state,
        }
    }
}
