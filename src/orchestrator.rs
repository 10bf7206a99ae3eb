//! Request orchestration: options loading with retry, paired predictions under one deadline.

use crate::api::PredictionBackend;
use crate::constants::{OPTIONS_BACKOFF_STEP, OPTIONS_MAX_RETRIES, OPTIONS_TIMEOUT, PREDICT_TIMEOUT};
use crate::error::{FetchError, Operation};
use crate::types::{LaptopForm, OptionSet, PricePair};
use crate::validation::to_request;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Delays to wait before each retry. `delays[n]` precedes retry `n + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    delays: Vec<Duration>,
}

impl RetryPolicy {
    pub fn new(delays: Vec<Duration>) -> Self {
        Self { delays }
    }

    /// `max_retries` retries, the n-th one after `step * n`.
    pub fn linear(step: Duration, max_retries: u32) -> Self {
        Self::new((1..=max_retries).map(|n| step * n).collect())
    }

    pub fn max_retries(&self) -> usize {
        self.delays.len()
    }

    /// Delay after `failed_attempts` failures, or `None` once retries are exhausted.
    pub fn delay_after(&self, failed_attempts: u32) -> Option<Duration> {
        let idx = (failed_attempts as usize).checked_sub(1)?;
        self.delays.get(idx).copied()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::linear(OPTIONS_BACKOFF_STEP, OPTIONS_MAX_RETRIES)
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    backend: Arc<dyn PredictionBackend>,
    retry: RetryPolicy,
    options_timeout: Duration,
    predict_timeout: Duration,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn PredictionBackend>) -> Self {
        Self {
            backend,
            retry: RetryPolicy::default(),
            options_timeout: OPTIONS_TIMEOUT,
            predict_timeout: PREDICT_TIMEOUT,
        }
    }

    #[cfg(test)]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Load the option catalog.
    ///
    /// Each attempt has its own deadline. Transport and server failures are retried per the
    /// retry policy; a deadline expiry or cancellation ends the operation immediately.
    pub async fn fetch_options(&self, cancel: &CancellationToken) -> Result<OptionSet, FetchError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            debug!(attempt, "Requesting options");

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                res = tokio::time::timeout(self.options_timeout, self.backend.options()) => res,
            };

            let err = match outcome {
                Ok(Ok(options)) => {
                    info!(attempt, companies = options.companies.len(), "Options loaded");
                    return Ok(options);
                }
                Ok(Err(e)) => e,
                Err(_) => {
                    warn!(
                        attempt,
                        timeout_ms = self.options_timeout.as_millis() as u64,
                        "Options request timed out"
                    );
                    return Err(FetchError::Timeout {
                        operation: Operation::Options,
                    });
                }
            };

            let Some(delay) = self.retry.delay_after(attempt) else {
                error!(attempts = attempt, error = %err, "Options request failed, giving up");
                return Err(FetchError::Request {
                    operation: Operation::Options,
                    source: err,
                });
            };

            warn!(
                attempt,
                max_retries = self.retry.max_retries(),
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Options request failed, retrying"
            );

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Predict both sides concurrently under one shared deadline.
    ///
    /// Both forms are validated before anything is sent. The first side to fail fails the
    /// whole pair at once and the other request is dropped; if both fail together the left
    /// error is reported.
    pub async fn predict_pair(
        &self,
        left: &LaptopForm,
        right: &LaptopForm,
        cancel: &CancellationToken,
    ) -> Result<PricePair, FetchError> {
        let left_req = to_request(left)?;
        let right_req = to_request(right)?;

        info!(left = %left_req.product, right = %right_req.product, "Requesting price predictions");

        let both = futures::future::try_join(
            self.backend.predict(&left_req),
            self.backend.predict(&right_req),
        );

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(FetchError::Cancelled),
            res = tokio::time::timeout(self.predict_timeout, both) => match res {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(
                        timeout_ms = self.predict_timeout.as_millis() as u64,
                        "Prediction timed out"
                    );
                    return Err(FetchError::Timeout {
                        operation: Operation::Predict,
                    });
                }
            },
        };

        match outcome {
            Ok((l, r)) => {
                info!(left = l.predicted_price, right = r.predicted_price, "Predictions received");
                Ok(PricePair {
                    left: l.predicted_price,
                    right: r.predicted_price,
                })
            }
            Err(e) => {
                error!(error = %e, "Prediction failed");
                Err(FetchError::Request {
                    operation: Operation::Predict,
                    source: e,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{RequestError, ValidationError};
    use crate::types::{PredictRequest, PredictResponse, Side};
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use tokio::time::Instant;

    type OptionsStep = (Duration, Result<OptionSet, RequestError>);

    /// Backend double: scripted options responses and per-company prediction results.
    #[derive(Default)]
    struct ScriptedBackend {
        options_script: Mutex<VecDeque<OptionsStep>>,
        options_calls: Mutex<Vec<Instant>>,
        predictions: HashMap<String, (Duration, Result<f64, RequestError>)>,
        predict_calls: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn with_options(steps: Vec<OptionsStep>) -> Self {
            Self {
                options_script: Mutex::new(steps.into()),
                ..Default::default()
            }
        }

        fn with_predictions(entries: Vec<(&str, Duration, Result<f64, RequestError>)>) -> Self {
            Self {
                predictions: entries
                    .into_iter()
                    .map(|(company, delay, res)| (company.to_string(), (delay, res)))
                    .collect(),
                ..Default::default()
            }
        }

        fn options_call_count(&self) -> usize {
            self.options_calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl PredictionBackend for ScriptedBackend {
        async fn options(&self) -> Result<OptionSet, RequestError> {
            self.options_calls.lock().unwrap().push(Instant::now());
            let step = self.options_script.lock().unwrap().pop_front();
            let (delay, result) = step.unwrap_or((
                Duration::ZERO,
                Err(RequestError::Transport("script exhausted".into())),
            ));
            tokio::time::sleep(delay).await;
            result
        }

        async fn predict(&self, request: &PredictRequest) -> Result<PredictResponse, RequestError> {
            self.predict_calls.lock().unwrap().push(request.company.clone());
            let (delay, result) = self
                .predictions
                .get(&request.company)
                .cloned()
                .unwrap_or((Duration::ZERO, Err(RequestError::Transport("unknown".into()))));
            tokio::time::sleep(delay).await;
            result.map(|predicted_price| PredictResponse {
                predicted_price,
                currency: Some("EUR".into()),
            })
        }
    }

    fn catalog() -> OptionSet {
        OptionSet {
            companies: vec!["Dell".into(), "HP".into()],
            rams_gb: vec![8, 16],
            ..Default::default()
        }
    }

    fn server_error() -> RequestError {
        RequestError::Http { status: 503, body: "unavailable".into() }
    }

    fn form(company: &str) -> LaptopForm {
        LaptopForm {
            company: company.into(),
            product: format!("{} laptop", company),
            type_name: "Notebook".into(),
            inches: "15.6".into(),
            screen_resolution: "1920x1080".into(),
            cpu: "Intel Core i5".into(),
            ram: "8".into(),
            memory: "256GB SSD".into(),
            gpu: "Intel HD".into(),
            op_sys: "Windows 10".into(),
            weight: "2.1".into(),
        }
    }

    fn orchestrator(backend: &Arc<ScriptedBackend>) -> Orchestrator {
        Orchestrator::new(backend.clone())
    }

    #[test]
    fn default_policy_backs_off_two_four_six_seconds() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries(), 3);
        assert_eq!(policy.delay_after(0), None);
        assert_eq!(policy.delay_after(1), Some(Duration::from_secs(2)));
        assert_eq!(policy.delay_after(2), Some(Duration::from_secs(4)));
        assert_eq!(policy.delay_after(3), Some(Duration::from_secs(6)));
        assert_eq!(policy.delay_after(4), None);
        assert_eq!(RetryPolicy::new(Vec::new()).delay_after(1), None);
    }

    #[tokio::test(start_paused = true)]
    async fn options_succeed_on_first_attempt() {
        let backend = Arc::new(ScriptedBackend::with_options(vec![(Duration::from_millis(50), Ok(catalog()))]));
        let options = orchestrator(&backend)
            .fetch_options(&CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(options, catalog());
        assert_eq!(backend.options_call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn options_fetch_is_repeatable() {
        let backend = Arc::new(ScriptedBackend::with_options(vec![
            (Duration::ZERO, Ok(catalog())),
            (Duration::ZERO, Ok(catalog())),
        ]));
        let orch = orchestrator(&backend);
        let token = CancellationToken::new();
        let first = orch.fetch_options(&token).await.unwrap();
        let second = orch.fetch_options(&token).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn failing_backend_gets_four_attempts_with_growing_delays() {
        let backend = Arc::new(ScriptedBackend::with_options(
            (0..4).map(|_| (Duration::ZERO, Err(server_error()))).collect(),
        ));
        let err = orchestrator(&backend)
            .fetch_options(&CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            FetchError::Request { operation: Operation::Options, source: server_error() }
        );
        assert_eq!(err.user_message("http://x"), "Failed to load data: unavailable");

        let calls = backend.options_calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 4);
        let gaps: Vec<Duration> = calls.windows(2).map(|w| w[1] - w[0]).collect();
        assert_eq!(
            gaps,
            vec![Duration::from_secs(2), Duration::from_secs(4), Duration::from_secs(6)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn retry_recovers_after_transient_failures() {
        let backend = Arc::new(ScriptedBackend::with_options(vec![
            (Duration::ZERO, Err(server_error())),
            (Duration::ZERO, Err(RequestError::Transport("connection reset".into()))),
            (Duration::ZERO, Ok(catalog())),
        ]));
        let options = orchestrator(&backend)
            .fetch_options(&CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(options, catalog());
        assert_eq!(backend.options_call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn injected_schedule_controls_attempts() {
        let backend = Arc::new(ScriptedBackend::with_options(
            (0..5).map(|_| (Duration::ZERO, Err(server_error()))).collect(),
        ));
        let orch = orchestrator(&backend)
            .with_retry_policy(RetryPolicy::new(vec![Duration::from_millis(1); 2]));
        let started = Instant::now();
        assert!(orch.fetch_options(&CancellationToken::new()).await.is_err());
        assert_eq!(backend.options_call_count(), 3);
        assert_eq!(started.elapsed(), Duration::from_millis(2));
    }

    #[tokio::test(start_paused = true)]
    async fn timed_out_attempt_is_not_retried() {
        let backend = Arc::new(ScriptedBackend::with_options(vec![
            (Duration::from_secs(30), Ok(catalog())),
            (Duration::ZERO, Ok(catalog())),
        ]));
        let started = Instant::now();
        let err = orchestrator(&backend)
            .fetch_options(&CancellationToken::new())
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert_eq!(err, FetchError::Timeout { operation: Operation::Options });
        assert_eq!(backend.options_call_count(), 1);
        assert_eq!(started.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_after_a_failure_still_ends_the_fetch() {
        let backend = Arc::new(ScriptedBackend::with_options(vec![
            (Duration::ZERO, Err(server_error())),
            (Duration::from_secs(60), Ok(catalog())),
        ]));
        let err = orchestrator(&backend)
            .fetch_options(&CancellationToken::new())
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(backend.options_call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_fetch_is_not_retried() {
        let backend = Arc::new(ScriptedBackend::with_options(vec![(Duration::from_secs(5), Ok(catalog()))]));
        let orch = orchestrator(&backend);
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            canceller.cancel();
        });

        assert_eq!(orch.fetch_options(&token).await, Err(FetchError::Cancelled));
        assert_eq!(backend.options_call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_backoff() {
        let backend = Arc::new(ScriptedBackend::with_options(
            (0..4).map(|_| (Duration::ZERO, Err(server_error()))).collect(),
        ));
        let orch = orchestrator(&backend);
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(3)).await;
            canceller.cancel();
        });

        assert_eq!(orch.fetch_options(&token).await, Err(FetchError::Cancelled));
        // First attempt at t=0, retry at t=2, cancelled during the 4s backoff.
        assert_eq!(backend.options_call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn predictions_stay_paired_when_right_finishes_first() {
        let backend = Arc::new(ScriptedBackend::with_predictions(vec![
            ("Dell", Duration::from_millis(500), Ok(1000.0)),
            ("HP", Duration::from_millis(10), Ok(1200.0)),
        ]));
        let pair = orchestrator(&backend)
            .predict_pair(&form("Dell"), &form("HP"), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(pair, PricePair { left: 1000.0, right: 1200.0 });

        let mut comparison = crate::types::Comparison::default();
        comparison.set(pair);
        assert_eq!(comparison.difference(), Some(200.0));
        assert_eq!(comparison.cheaper(), Some(Side::Left));
    }

    #[tokio::test(start_paused = true)]
    async fn one_failing_side_fails_the_pair() {
        let backend = Arc::new(ScriptedBackend::with_predictions(vec![
            ("Dell", Duration::ZERO, Ok(1000.0)),
            (
                "HP",
                Duration::from_millis(20),
                Err(RequestError::Http { status: 500, body: "model error".into() }),
            ),
        ]));
        let err = orchestrator(&backend)
            .predict_pair(&form("Dell"), &form("HP"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Request { operation: Operation::Predict, .. }));
        assert!(err.user_message("http://x").contains("model error"));
    }

    #[tokio::test(start_paused = true)]
    async fn failing_side_does_not_wait_for_a_hanging_side() {
        let backend = Arc::new(ScriptedBackend::with_predictions(vec![
            ("Dell", Duration::ZERO, Err(RequestError::Transport("connection refused".into()))),
            ("HP", Duration::from_secs(60), Ok(1200.0)),
        ]));
        let start = Instant::now();
        let err = orchestrator(&backend)
            .predict_pair(&form("Dell"), &form("HP"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Request { operation: Operation::Predict, .. }));
        assert!(!err.is_timeout());
        assert_eq!(err.user_message("http://x"), "Prediction failed: connection refused");
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn earliest_failure_is_reported() {
        let backend = Arc::new(ScriptedBackend::with_predictions(vec![
            (
                "Dell",
                Duration::from_millis(50),
                Err(RequestError::Http { status: 500, body: "left broke".into() }),
            ),
            (
                "HP",
                Duration::from_millis(10),
                Err(RequestError::Http { status: 500, body: "right broke".into() }),
            ),
        ]));
        let err = orchestrator(&backend)
            .predict_pair(&form("Dell"), &form("HP"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.user_message("http://x"), "Prediction failed: right broke");
    }

    #[tokio::test(start_paused = true)]
    async fn left_error_wins_when_both_fail_together() {
        let backend = Arc::new(ScriptedBackend::with_predictions(vec![
            (
                "Dell",
                Duration::from_millis(50),
                Err(RequestError::Http { status: 500, body: "left broke".into() }),
            ),
            (
                "HP",
                Duration::from_millis(50),
                Err(RequestError::Http { status: 500, body: "right broke".into() }),
            ),
        ]));
        let err = orchestrator(&backend)
            .predict_pair(&form("Dell"), &form("HP"), &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.user_message("http://x"), "Prediction failed: left broke");
    }

    #[tokio::test(start_paused = true)]
    async fn shared_deadline_times_out_the_pair() {
        let backend = Arc::new(ScriptedBackend::with_predictions(vec![
            ("Dell", Duration::from_secs(1), Ok(1000.0)),
            ("HP", Duration::from_secs(20), Ok(1200.0)),
        ]));
        let started = Instant::now();
        let err = orchestrator(&backend)
            .predict_pair(&form("Dell"), &form("HP"), &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::Timeout { operation: Operation::Predict });
        assert_eq!(started.elapsed(), Duration::from_secs(15));
        assert_eq!(backend.predict_calls.lock().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_form_sends_nothing() {
        let backend = Arc::new(ScriptedBackend::with_predictions(vec![
            ("Dell", Duration::ZERO, Ok(1000.0)),
            ("HP", Duration::ZERO, Ok(1200.0)),
        ]));
        let mut right = form("HP");
        right.weight = "n/a".into();

        let err = orchestrator(&backend)
            .predict_pair(&form("Dell"), &right, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err, FetchError::Validation(ValidationError::InvalidWeight));
        assert_eq!(err.user_message("http://x"), "Weight is not valid");
        assert!(backend.predict_calls.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_prediction_reports_cancellation() {
        let backend = Arc::new(ScriptedBackend::with_predictions(vec![
            ("Dell", Duration::from_secs(5), Ok(1000.0)),
            ("HP", Duration::from_secs(5), Ok(1200.0)),
        ]));
        let token = CancellationToken::new();
        token.cancel();
        let err = orchestrator(&backend)
            .predict_pair(&form("Dell"), &form("HP"), &token)
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::Cancelled);
    }
}
