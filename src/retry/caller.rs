use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::policy::{Failure, GenerationOutcome, RetryPolicy};
use super::state::{CallEvent, CallState};
use crate::gemini::{ContentGenerator, GenerationRequest};
use crate::normalize::parse_structured;

/// What a single call did on its way to an outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallTrace {
    /// Attempts issued against the endpoint.
    pub attempts: u32,
    /// Backoff waits, in the order they were slept.
    pub waits: Vec<Duration>,
}

/// Drives a [`CallState`] machine against a [`ContentGenerator`].
pub struct ResilientCaller<G> {
    generator: G,
    policy: RetryPolicy,
}

impl<G: ContentGenerator> ResilientCaller<G> {
    pub fn new(generator: G, policy: RetryPolicy) -> Self {
        Self { generator, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub async fn call(&self, req: &GenerationRequest) -> GenerationOutcome {
        self.call_traced(req).await.0
    }

    /// Run the call to resolution, returning the outcome and what it took.
    pub async fn call_traced(&self, req: &GenerationRequest) -> (GenerationOutcome, CallTrace) {
        let mut trace = CallTrace::default();
        let mut state = CallState::start();

        let outcome = loop {
            let event = match state {
                CallState::Resolved(outcome) => break outcome,
                CallState::Attempting { .. } => {
                    trace.attempts += 1;
                    match self.generator.generate(req).await {
                        Ok(text) => CallEvent::Responded(text),
                        Err(e) => CallEvent::Errored {
                            class: e.classify(),
                            message: e.to_string(),
                        },
                    }
                }
                CallState::Backoff { attempt, wait, kind } => {
                    log_retry(attempt + 1, self.policy.attempts(), &kind.to_string(), wait);
                    sleep(wait).await;
                    trace.waits.push(wait);
                    CallEvent::Waited
                }
            };
            state = state.next(event, &self.policy);
        };

        if let GenerationOutcome::Failure(failure) = &outcome {
            debug!(model = req.model(), attempts = trace.attempts, "call failed: {failure}");
        }
        (outcome, trace)
    }

    /// Call, then parse the text as JSON into `T`.
    pub async fn call_json<T: DeserializeOwned>(&self, req: &GenerationRequest) -> Result<T, Failure> {
        let text = self.call(req).await.into_result()?;
        parse_structured(&text)
    }
}

fn log_retry(attempt: u32, max: u32, reason: &str, wait: Duration) {
    warn!(
        "attempt {attempt}/{max} failed: {reason} (waiting {}ms)",
        wait.as_millis()
    );
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use serde_json::{Value, json};
    use tokio::time::Instant;
    use tracing_test::traced_test;

    use super::*;
    use crate::gemini::GeminiError;
    use crate::retry::TransientKind;

    /// Replays a fixed sequence of results; errors once the script runs out.
    struct ScriptedGenerator {
        script: Mutex<VecDeque<Result<String, GeminiError>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedGenerator {
        fn new(script: Vec<Result<String, GeminiError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    impl ContentGenerator for ScriptedGenerator {
        async fn generate(&self, _req: &GenerationRequest) -> Result<String, GeminiError> {
            *self.calls.lock().unwrap() += 1;
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GeminiError::ApiError {
                    status: 418,
                    message: "script exhausted".into(),
                }))
        }
    }

    fn overloaded() -> Result<String, GeminiError> {
        Err(GeminiError::Overloaded {
            message: "The model is overloaded".into(),
        })
    }

    fn rate_limited() -> Result<String, GeminiError> {
        Err(GeminiError::RateLimited {
            message: "Resource has been exhausted".into(),
        })
    }

    fn policy(max_retries: u32, base_ms: u64) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay_ms: base_ms,
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest::new("gemini-test", "prompt")
    }

    #[tokio::test(start_paused = true)]
    async fn success_on_first_attempt_never_sleeps() {
        let generator = ScriptedGenerator::new(vec![Ok("hello".into())]);
        let caller = ResilientCaller::new(&generator, policy(5, 10_000));

        let started = Instant::now();
        let (outcome, trace) = caller.call_traced(&request()).await;

        assert_eq!(outcome, GenerationOutcome::Success("hello".into()));
        assert_eq!(trace.attempts, 1);
        assert!(trace.waits.is_empty());
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn two_overloads_then_success() {
        let generator =
            ScriptedGenerator::new(vec![overloaded(), overloaded(), Ok("third time".into())]);
        let caller = ResilientCaller::new(&generator, policy(5, 10_000));

        let started = Instant::now();
        let (outcome, trace) = caller.call_traced(&request()).await;

        assert_eq!(outcome, GenerationOutcome::Success("third time".into()));
        assert_eq!(trace.attempts, 3);
        assert_eq!(
            trace.waits,
            vec![Duration::from_secs(10), Duration::from_secs(20)]
        );
        assert!(started.elapsed() >= Duration::from_secs(30));
        assert_eq!(generator.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_transient_errors_exhaust_budget() {
        let generator = ScriptedGenerator::new(vec![
            rate_limited(),
            overloaded(),
            rate_limited(),
            overloaded(),
        ]);
        let caller = ResilientCaller::new(&generator, policy(4, 2000));

        let (outcome, trace) = caller.call_traced(&request()).await;

        assert_eq!(
            outcome,
            GenerationOutcome::Failure(Failure::RetriesExhausted {
                attempts: 4,
                last: TransientKind::Overload,
            })
        );
        assert_eq!(trace.attempts, 4);
        assert_eq!(
            trace.waits,
            vec![
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(8),
            ]
        );
        assert!(trace.waits.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(generator.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn fatal_error_stops_after_one_attempt() {
        let generator = ScriptedGenerator::new(vec![
            Err(GeminiError::ApiError {
                status: 400,
                message: "API key not valid".into(),
            }),
            Ok("never reached".into()),
        ]);
        let caller = ResilientCaller::new(&generator, policy(5, 10_000));

        let started = Instant::now();
        let (outcome, trace) = caller.call_traced(&request()).await;

        assert_eq!(
            outcome,
            GenerationOutcome::Failure(Failure::Fatal {
                message: "API error (status 400): API key not valid".into()
            })
        );
        assert_eq!(trace.attempts, 1);
        assert!(trace.waits.is_empty());
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    #[traced_test]
    async fn exhausted_call_logs_below_error_level() {
        let generator = ScriptedGenerator::new(vec![rate_limited(), rate_limited()]);
        let caller = ResilientCaller::new(&generator, policy(2, 1000));

        let outcome = caller.call(&request()).await;

        assert!(!outcome.is_success());
        assert!(logs_contain("attempt 1/2 failed: rate limited"));
        assert!(logs_contain("call failed"));
        logs_assert(|lines: &[&str]| {
            match lines.iter().filter(|line| line.contains("ERROR")).count() {
                0 => Ok(()),
                n => Err(format!("expected no error-level events, got {n}")),
            }
        });
    }

    #[tokio::test(start_paused = true)]
    async fn unstructured_overload_message_is_retried() {
        let generator = ScriptedGenerator::new(vec![
            Err(GeminiError::NetworkError {
                status: None,
                message: "[GoogleGenerativeAI Error]: model is overloaded".into(),
            }),
            Ok("recovered".into()),
        ]);
        let caller = ResilientCaller::new(&generator, policy(3, 1000));

        let (outcome, trace) = caller.call_traced(&request()).await;
        assert!(outcome.is_success());
        assert_eq!(trace.waits, vec![Duration::from_secs(1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn call_json_strips_fences() {
        let generator = ScriptedGenerator::new(vec![Ok("```json\n{\"a\":1}\n```".into())]);
        let caller = ResilientCaller::new(&generator, policy(1, 1000));

        let value: Value = caller.call_json(&request().json()).await.unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[tokio::test(start_paused = true)]
    async fn call_json_reports_malformed_payload_without_retrying() {
        let generator = ScriptedGenerator::new(vec![Ok("not json at all".into())]);
        let caller = ResilientCaller::new(&generator, policy(5, 1000));

        let result: Result<Value, Failure> = caller.call_json(&request().json()).await;
        assert!(matches!(result, Err(Failure::MalformedPayload { .. })));
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn call_json_passes_through_transport_failure() {
        let generator = ScriptedGenerator::new(vec![rate_limited()]);
        let caller = ResilientCaller::new(&generator, policy(1, 1000));

        let result: Result<Value, Failure> = caller.call_json(&request()).await;
        assert_eq!(
            result,
            Err(Failure::RetriesExhausted {
                attempts: 1,
                last: TransientKind::RateLimit,
            })
        );
    }
}
