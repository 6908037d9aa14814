//! Simulator facade
//!
//! Composes store, mutation engine, and dispatcher behind one handle. The
//! store and mutation engine live under a single `RwLock`, so sample +
//! mutate for one trigger is atomic with respect to other triggers: two
//! concurrent triggers can never race on the same stock's price. Dispatch
//! runs outside the lock, so a paced webhook round never blocks store
//! reads or other triggers.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use types::change::ChangeRecord;
use types::dispatch::{DispatchConfig, DispatchJob, DispatchReport};
use types::errors::{EngineError, StoreError};
use types::stock::Stock;

use crate::dispatch::{NotificationSender, WebhookDispatcher, DEFAULT_CALL_TIMEOUT};
use crate::mutation::{MutationConfig, MutationEngine};
use crate::store::StockStore;

/// Simulator construction parameters
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub mutation: MutationConfig,
    /// Seed for store and mutation RNGs; None draws from entropy
    pub seed: Option<u64>,
    /// Per-webhook-call timeout
    pub call_timeout: Duration,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            mutation: MutationConfig::default(),
            seed: None,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

/// Raw webhook parameters from the trigger boundary, validated on use
#[derive(Debug, Clone)]
pub struct WebhookParams {
    pub url: String,
    pub concurrency: usize,
    pub sleep_seconds: f64,
    pub duplicate: u32,
}

impl WebhookParams {
    /// Webhook params with the boundary defaults (sequential, no pacing)
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            concurrency: 1,
            sleep_seconds: 0.0,
            duplicate: 0,
        }
    }
}

/// One trigger request
#[derive(Debug, Clone)]
pub struct TriggerParams {
    pub number_to_change: usize,
    pub webhook: Option<WebhookParams>,
}

/// Result of one trigger: the changes, plus a report when a webhook was given
#[derive(Debug, Clone)]
pub struct TriggerOutcome {
    pub changes: Vec<ChangeRecord>,
    pub report: Option<DispatchReport>,
}

struct Inner {
    store: StockStore,
    engine: MutationEngine,
}

/// Process-scoped simulator handle
pub struct Simulator {
    inner: RwLock<Inner>,
    dispatcher: WebhookDispatcher,
}

impl Simulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self::build(config, None)
    }

    /// Simulator with a custom notification sender, used by tests
    pub fn with_sender(config: SimulatorConfig, sender: Arc<dyn NotificationSender>) -> Self {
        Self::build(config, Some(sender))
    }

    fn build(config: SimulatorConfig, sender: Option<Arc<dyn NotificationSender>>) -> Self {
        let (store, engine) = match config.seed {
            Some(seed) => (
                StockStore::with_seed(seed),
                MutationEngine::with_seed(config.mutation, seed.wrapping_add(1)),
            ),
            None => (StockStore::new(), MutationEngine::new(config.mutation)),
        };

        let dispatcher = match sender {
            Some(sender) => WebhookDispatcher::with_sender(sender, config.call_timeout),
            None => WebhookDispatcher::with_timeout(config.call_timeout),
        };

        Self {
            inner: RwLock::new(Inner { store, engine }),
            dispatcher,
        }
    }

    /// Replace the store with `amount` fresh stocks, returning the new population
    pub async fn initialize(&self, amount: usize) -> Result<Vec<Stock>, StoreError> {
        let mut inner = self.inner.write().await;
        inner.store.initialize(amount)?;
        tracing::info!(amount, "stock store initialized");
        Ok(inner.store.stocks().to_vec())
    }

    /// Current stock count
    pub async fn size(&self) -> usize {
        self.inner.read().await.store.size()
    }

    /// Copy of the current population, in id order
    pub async fn snapshot(&self) -> Vec<Stock> {
        self.inner.read().await.store.stocks().to_vec()
    }

    /// Sample and mutate `n` stocks atomically
    ///
    /// Holds the write lock across sample + mutate, so no other trigger
    /// can select an overlapping set mid-mutation.
    pub async fn change_randomly(&self, n: usize) -> Result<Vec<ChangeRecord>, StoreError> {
        let mut inner = self.inner.write().await;
        let Inner { store, engine } = &mut *inner;

        let ids = store.sample(n)?;
        let changes = engine.mutate(store, &ids);
        tracing::debug!(changed = changes.len(), "stocks mutated");
        Ok(changes)
    }

    /// Deliver a batch of changes to a webhook target
    pub async fn dispatch(
        &self,
        changes: Vec<ChangeRecord>,
        config: DispatchConfig,
    ) -> DispatchReport {
        self.dispatcher
            .dispatch(DispatchJob::new(config, changes))
            .await
    }

    /// Full trigger: validate, mutate, then optionally dispatch
    ///
    /// Dispatch parameters are validated before any mutation, so a
    /// malformed webhook request leaves the store untouched.
    pub async fn trigger(&self, params: TriggerParams) -> Result<TriggerOutcome, EngineError> {
        let config = params
            .webhook
            .map(|w| DispatchConfig::new(&w.url, w.concurrency, w.sleep_seconds, w.duplicate))
            .transpose()?;

        let changes = self.change_randomly(params.number_to_change).await?;

        let report = match config {
            Some(config) => Some(self.dispatch(changes.clone(), config).await),
            None => None,
        };

        Ok(TriggerOutcome { changes, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::SendError;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use types::change::WebhookPayload;
    use types::errors::DispatchConfigError;
    use types::ids::StockId;
    use url::Url;

    struct CountingSender {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl NotificationSender for CountingSender {
        async fn send(&self, _url: &Url, _payload: &WebhookPayload) -> Result<u16, SendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(200)
        }
    }

    fn seeded(seed: u64) -> Simulator {
        Simulator::new(SimulatorConfig {
            seed: Some(seed),
            ..SimulatorConfig::default()
        })
    }

    #[tokio::test]
    async fn test_initialize_and_size() {
        let sim = seeded(1);
        let stocks = sim.initialize(100).await.unwrap();
        assert_eq!(stocks.len(), 100);
        assert_eq!(sim.size().await, 100);
    }

    #[tokio::test]
    async fn test_reinitialize_resets_population() {
        let sim = seeded(2);
        sim.initialize(100_000).await.unwrap();
        sim.initialize(100_000).await.unwrap();
        assert_eq!(sim.size().await, 100_000);

        let ids: HashSet<StockId> = sim.snapshot().await.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), 100_000);
    }

    #[tokio::test]
    async fn test_trigger_without_webhook() {
        let sim = seeded(3);
        sim.initialize(50).await.unwrap();

        let outcome = sim
            .trigger(TriggerParams {
                number_to_change: 20,
                webhook: None,
            })
            .await
            .unwrap();

        assert_eq!(outcome.changes.len(), 20);
        assert!(outcome.report.is_none());

        let ids: HashSet<StockId> = outcome.changes.iter().map(|c| c.stock_id).collect();
        assert_eq!(ids.len(), 20, "each change must reference a distinct stock");

        let snapshot = sim.snapshot().await;
        for change in &outcome.changes {
            let stock = snapshot
                .iter()
                .find(|s| s.id == change.stock_id)
                .expect("changed id must exist in store");
            assert_eq!(stock.price, change.new_price);
        }
    }

    #[tokio::test]
    async fn test_trigger_with_webhook_produces_report() {
        let sender = Arc::new(CountingSender {
            calls: AtomicUsize::new(0),
        });
        let sim = Simulator::with_sender(
            SimulatorConfig {
                seed: Some(8),
                ..SimulatorConfig::default()
            },
            sender.clone(),
        );
        sim.initialize(20).await.unwrap();

        let outcome = sim
            .trigger(TriggerParams {
                number_to_change: 5,
                webhook: Some(WebhookParams {
                    concurrency: 2,
                    ..WebhookParams::new("http://localhost/hook")
                }),
            })
            .await
            .unwrap();

        let report = outcome.report.expect("report expected for webhook trigger");
        assert_eq!(report.attempts.len(), 5);
        assert_eq!(report.delivered_count(), 5);
        assert_eq!(report.groups_dispatched, 3);
        assert_eq!(sender.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_trigger_too_many_fails() {
        let sim = seeded(4);
        sim.initialize(5).await.unwrap();

        let err = sim
            .trigger(TriggerParams {
                number_to_change: 6,
                webhook: None,
            })
            .await
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::Store(StoreError::InsufficientStock {
                requested: 6,
                available: 5
            })
        );
    }

    #[tokio::test]
    async fn test_trigger_on_empty_store_fails() {
        let sim = seeded(5);
        let err = sim
            .trigger(TriggerParams {
                number_to_change: 1,
                webhook: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err, EngineError::Store(StoreError::EmptyStore));
    }

    #[tokio::test]
    async fn test_invalid_dispatch_config_leaves_store_untouched() {
        let sim = seeded(6);
        sim.initialize(10).await.unwrap();
        let before = sim.snapshot().await;

        let err = sim
            .trigger(TriggerParams {
                number_to_change: 5,
                webhook: Some(WebhookParams {
                    url: "http://localhost/hook".to_string(),
                    concurrency: 0,
                    sleep_seconds: 0.0,
                    duplicate: 0,
                }),
            })
            .await
            .unwrap_err();

        assert_eq!(
            err,
            EngineError::InvalidDispatchConfig(DispatchConfigError::InvalidConcurrency {
                concurrency: 0
            })
        );
        assert_eq!(sim.snapshot().await, before, "no partial mutation allowed");
    }

    #[tokio::test]
    async fn test_concurrent_triggers_serialized() {
        let sim = Arc::new(seeded(7));
        sim.initialize(100).await.unwrap();

        let a = {
            let sim = sim.clone();
            tokio::spawn(async move { sim.change_randomly(60).await })
        };
        let b = {
            let sim = sim.clone();
            tokio::spawn(async move { sim.change_randomly(60).await })
        };

        let changes_a = a.await.unwrap().unwrap();
        let changes_b = b.await.unwrap().unwrap();

        assert_eq!(changes_a.len(), 60);
        assert_eq!(changes_b.len(), 60);

        // Each trigger saw a consistent store: the old price of every
        // change equals the store price at its own sample time, so where
        // the two triggers overlapped, the later one chains off the
        // earlier one's new price.
        let snapshot = sim.snapshot().await;
        let ids: HashSet<StockId> = snapshot.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), 100);
        for stock in &snapshot {
            assert!(stock.price >= types::numeric::Price::zero());
        }
    }
}
