//! Webhook dispatch
//!
//! Delivers change notifications in concurrency-bounded groups. Groups are
//! processed strictly in sequence; within a group one call is issued per
//! record via a bounded `join_all` fan-out (no unbounded task spawning).
//! After every group except the last the dispatcher pauses for the
//! configured sleep, which suspends only this job, never the store.
//!
//! Failures are signal, not noise: a timed-out or refused call is recorded
//! in the report and never retried.

use async_trait::async_trait;
use futures::future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use types::change::{ChangeRecord, WebhookPayload};
use types::dispatch::{
    DeliveryAttempt, DeliveryOutcome, DispatchJob, DispatchReport, JobState,
};
use url::Url;

/// Default per-call timeout
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport-level send failure
#[derive(Error, Debug)]
pub enum SendError {
    #[error("transport error: {0}")]
    Transport(String),
}

/// One webhook notification call
///
/// The seam between dispatch logic and the HTTP client, so delivery
/// semantics can be tested against recording fakes.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// POST one payload to the target, returning the HTTP status code
    async fn send(&self, url: &Url, payload: &WebhookPayload) -> Result<u16, SendError>;
}

/// Production sender backed by a shared reqwest client
pub struct HttpSender {
    client: reqwest::Client,
}

impl HttpSender {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationSender for HttpSender {
    async fn send(&self, url: &Url, payload: &WebhookPayload) -> Result<u16, SendError> {
        let response = self
            .client
            .post(url.clone())
            .json(payload)
            .send()
            .await
            .map_err(|e| SendError::Transport(e.to_string()))?;
        Ok(response.status().as_u16())
    }
}

/// Grouped, paced, duplicated webhook delivery
pub struct WebhookDispatcher {
    sender: Arc<dyn NotificationSender>,
    call_timeout: Duration,
}

impl WebhookDispatcher {
    /// Dispatcher with the production HTTP sender and default timeout
    pub fn new() -> Self {
        Self::with_sender(Arc::new(HttpSender::new()), DEFAULT_CALL_TIMEOUT)
    }

    /// Dispatcher with the production HTTP sender and a custom timeout
    pub fn with_timeout(call_timeout: Duration) -> Self {
        Self::with_sender(Arc::new(HttpSender::new()), call_timeout)
    }

    /// Dispatcher with an arbitrary sender, used by tests
    pub fn with_sender(sender: Arc<dyn NotificationSender>, call_timeout: Duration) -> Self {
        Self {
            sender,
            call_timeout,
        }
    }

    /// Run one dispatch job to completion and report per-attempt outcomes
    ///
    /// The job's parameters are already validated (`DispatchConfig` cannot
    /// be constructed otherwise), so this never fails as a whole: every
    /// notification outcome, good or bad, lands in the report.
    pub async fn dispatch(&self, job: DispatchJob) -> DispatchReport {
        let config = &job.config;
        let groups: Vec<&[ChangeRecord]> = job.changes.chunks(config.concurrency()).collect();
        let passes = config.attempts_per_record();
        let total_groups = groups.len() * passes as usize;

        let mut state = JobState::Pending;
        tracing::debug!(
            job_id = %job.id,
            state = %state,
            records = job.changes.len(),
            concurrency = config.concurrency(),
            groups = total_groups,
            "dispatch job accepted"
        );

        let mut attempts = Vec::with_capacity(job.changes.len() * passes as usize);
        let mut group_index = 0;

        for attempt in 1..=passes {
            for group in &groups {
                state = JobState::Dispatching { group: group_index };
                tracing::debug!(job_id = %job.id, state = %state, size = group.len(), "dispatching group");

                let calls = group
                    .iter()
                    .map(|record| self.notify(config.webhook_url(), record, attempt));
                attempts.extend(future::join_all(calls).await);

                group_index += 1;
                if group_index < total_groups && !config.sleep().is_zero() {
                    tokio::time::sleep(config.sleep()).await;
                }
            }
        }

        state = JobState::Completed;
        let report = DispatchReport {
            job_id: job.id,
            attempts,
            groups_dispatched: group_index,
        };
        tracing::info!(
            job_id = %job.id,
            state = %state,
            delivered = report.delivered_count(),
            failed = report.failed_count(),
            groups = report.groups_dispatched,
            "dispatch job finished"
        );
        report
    }

    /// Issue a single timeout-bounded notification call
    async fn notify(&self, url: &Url, record: &ChangeRecord, attempt: u32) -> DeliveryAttempt {
        let payload = WebhookPayload::from(record);
        let outcome = match tokio::time::timeout(self.call_timeout, self.sender.send(url, &payload))
            .await
        {
            Ok(Ok(status)) if (200..300).contains(&status) => DeliveryOutcome::Delivered { status },
            Ok(Ok(status)) => DeliveryOutcome::Rejected { status },
            Ok(Err(SendError::Transport(reason))) => DeliveryOutcome::Failed { reason },
            Err(_) => DeliveryOutcome::TimedOut,
        };

        if !outcome.is_success() {
            tracing::warn!(
                stock_id = %record.stock_id,
                attempt,
                outcome = ?outcome,
                "webhook notification failed"
            );
        }

        DeliveryAttempt {
            stock_id: record.stock_id,
            attempt,
            outcome,
        }
    }
}

impl Default for WebhookDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio::time::Instant;
    use types::dispatch::DispatchConfig;
    use types::ids::StockId;
    use types::numeric::Price;

    /// Recording fake: tracks call times and in-flight concurrency
    struct MockSender {
        delay: Duration,
        status: u16,
        refuse: bool,
        inflight: AtomicUsize,
        max_inflight: AtomicUsize,
        calls: Mutex<Vec<(StockId, Instant)>>,
    }

    impl MockSender {
        fn new(delay: Duration, status: u16) -> Arc<Self> {
            Arc::new(Self {
                delay,
                status,
                refuse: false,
                inflight: AtomicUsize::new(0),
                max_inflight: AtomicUsize::new(0),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn refusing() -> Arc<Self> {
            Arc::new(Self {
                delay: Duration::ZERO,
                status: 0,
                refuse: true,
                inflight: AtomicUsize::new(0),
                max_inflight: AtomicUsize::new(0),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl NotificationSender for MockSender {
        async fn send(&self, _url: &Url, payload: &WebhookPayload) -> Result<u16, SendError> {
            self.calls
                .lock()
                .unwrap()
                .push((payload.id, Instant::now()));

            let current = self.inflight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_inflight.fetch_max(current, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.inflight.fetch_sub(1, Ordering::SeqCst);

            if self.refuse {
                Err(SendError::Transport("connection refused".to_string()))
            } else {
                Ok(self.status)
            }
        }
    }

    fn changes(n: u64) -> Vec<ChangeRecord> {
        (1..=n)
            .map(|id| ChangeRecord {
                stock_id: StockId::new(id),
                symbol: format!("SYM{id:04}"),
                old_price: Price::from_u64(100),
                new_price: Price::from_u64(103),
                timestamp: Utc::now(),
            })
            .collect()
    }

    fn config(concurrency: usize, sleep: f64, duplicate: u32) -> DispatchConfig {
        DispatchConfig::new("http://localhost:9/hook", concurrency, sleep, duplicate).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_batching_groups_and_pacing() {
        let sender = MockSender::new(Duration::ZERO, 200);
        let dispatcher = WebhookDispatcher::with_sender(sender.clone(), DEFAULT_CALL_TIMEOUT);

        let start = Instant::now();
        let job = DispatchJob::new(config(10, 1.0, 0), changes(1000));
        let report = dispatcher.dispatch(job).await;

        // 100 groups of 10, one-second pause after each group but the last
        assert_eq!(report.groups_dispatched, 100);
        assert_eq!(report.attempts.len(), 1000);
        assert_eq!(start.elapsed(), Duration::from_secs(99));

        // Every group's calls share a start instant, one second apart
        let calls = sender.calls.lock().unwrap();
        let mut instants: Vec<Instant> = calls.iter().map(|(_, t)| *t).collect();
        instants.dedup();
        assert_eq!(instants.len(), 100);
        for pair in instants.windows(2) {
            assert_eq!(pair[1] - pair[0], Duration::from_secs(1));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrency_bound() {
        let sender = MockSender::new(Duration::from_millis(5), 200);
        let dispatcher = WebhookDispatcher::with_sender(sender.clone(), DEFAULT_CALL_TIMEOUT);

        let job = DispatchJob::new(config(10, 0.0, 0), changes(25));
        let report = dispatcher.dispatch(job).await;

        assert_eq!(report.groups_dispatched, 3);
        assert_eq!(report.attempts.len(), 25);
        assert_eq!(sender.max_inflight.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_default() {
        let sender = MockSender::new(Duration::from_millis(5), 200);
        let dispatcher = WebhookDispatcher::with_sender(sender.clone(), DEFAULT_CALL_TIMEOUT);

        let job = DispatchJob::new(config(1, 0.0, 0), changes(5));
        let report = dispatcher.dispatch(job).await;

        assert_eq!(report.groups_dispatched, 5);
        assert_eq!(sender.max_inflight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_duplicate_attempts() {
        let sender = MockSender::new(Duration::ZERO, 200);
        let dispatcher = WebhookDispatcher::with_sender(sender, DEFAULT_CALL_TIMEOUT);

        let job = DispatchJob::new(config(1, 0.0, 1), changes(1));
        let report = dispatcher.dispatch(job).await;

        assert_eq!(report.attempts.len(), 2);
        assert_eq!(report.groups_dispatched, 2);

        let per_stock = report.attempts_for(StockId::new(1));
        assert_eq!(per_stock.len(), 2);
        assert_eq!(per_stock[0].attempt, 1);
        assert_eq!(per_stock[1].attempt, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_sleep_after_final_group() {
        let sender = MockSender::new(Duration::ZERO, 200);
        let dispatcher = WebhookDispatcher::with_sender(sender, DEFAULT_CALL_TIMEOUT);

        let start = Instant::now();
        let job = DispatchJob::new(config(10, 5.0, 0), changes(10));
        dispatcher.dispatch(job).await;

        // Single group, so no pause at all
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failure_recorded_not_aborted() {
        let sender = MockSender::refusing();
        let dispatcher = WebhookDispatcher::with_sender(sender, DEFAULT_CALL_TIMEOUT);

        let job = DispatchJob::new(config(3, 0.0, 0), changes(7));
        let report = dispatcher.dispatch(job).await;

        assert_eq!(report.attempts.len(), 7);
        assert_eq!(report.delivered_count(), 0);
        for attempt in &report.attempts {
            assert!(matches!(attempt.outcome, DeliveryOutcome::Failed { .. }));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_success_status_is_rejected() {
        let sender = MockSender::new(Duration::ZERO, 503);
        let dispatcher = WebhookDispatcher::with_sender(sender, DEFAULT_CALL_TIMEOUT);

        let job = DispatchJob::new(config(2, 0.0, 0), changes(4));
        let report = dispatcher.dispatch(job).await;

        assert_eq!(report.failed_count(), 4);
        for attempt in &report.attempts {
            assert_eq!(attempt.outcome, DeliveryOutcome::Rejected { status: 503 });
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_call_times_out() {
        let sender = MockSender::new(Duration::from_secs(60), 200);
        let dispatcher = WebhookDispatcher::with_sender(sender, Duration::from_millis(100));

        let start = Instant::now();
        let job = DispatchJob::new(config(2, 0.0, 0), changes(2));
        let report = dispatcher.dispatch(job).await;

        // Bounded by the call timeout, not the sender's delay
        assert_eq!(start.elapsed(), Duration::from_millis(100));
        for attempt in &report.attempts {
            assert_eq!(attempt.outcome, DeliveryOutcome::TimedOut);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_batch() {
        let sender = MockSender::new(Duration::ZERO, 200);
        let dispatcher = WebhookDispatcher::with_sender(sender, DEFAULT_CALL_TIMEOUT);

        let job = DispatchJob::new(config(10, 1.0, 3), changes(0));
        let report = dispatcher.dispatch(job).await;

        assert!(report.attempts.is_empty());
        assert_eq!(report.groups_dispatched, 0);
    }
}
