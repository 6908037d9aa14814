//! Dispatch job, configuration, report, and state machine types
//!
//! A `DispatchJob` is ephemeral: one per trigger call with a webhook URL,
//! owned by the dispatcher for the duration of the call and destroyed when
//! dispatch completes.

use crate::change::ChangeRecord;
use crate::errors::DispatchConfigError;
use crate::ids::{JobId, StockId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;

/// Validated delivery parameters for one dispatch round
///
/// Construction through `new` is the only path, so a `DispatchConfig` in
/// hand is always well-formed and no network call is ever attempted with
/// bad parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchConfig {
    /// Target URL receiving one POST per (record, attempt) pair
    webhook_url: Url,
    /// Maximum calls in flight at once; groups are at most this size
    concurrency: usize,
    /// Pause between consecutive groups
    sleep: Duration,
    /// Extra notification passes per record (total attempts = duplicate + 1)
    duplicate: u32,
}

impl DispatchConfig {
    /// Validate raw trigger parameters into a dispatch config
    pub fn new(
        webhook_url: &str,
        concurrency: usize,
        sleep_seconds: f64,
        duplicate: u32,
    ) -> Result<Self, DispatchConfigError> {
        if concurrency < 1 {
            return Err(DispatchConfigError::InvalidConcurrency { concurrency });
        }
        // try_from_secs_f64 rejects NaN, infinities, negatives, and values
        // too large for a Duration
        let sleep = Duration::try_from_secs_f64(sleep_seconds).map_err(|_| {
            DispatchConfigError::InvalidSleep {
                seconds: sleep_seconds,
            }
        })?;
        let url = Url::parse(webhook_url).map_err(|e| DispatchConfigError::InvalidUrl {
            url: webhook_url.to_string(),
            reason: e.to_string(),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(DispatchConfigError::InvalidUrl {
                url: webhook_url.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        Ok(Self {
            webhook_url: url,
            concurrency,
            sleep,
            duplicate,
        })
    }

    pub fn webhook_url(&self) -> &Url {
        &self.webhook_url
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn sleep(&self) -> Duration {
        self.sleep
    }

    pub fn duplicate(&self) -> u32 {
        self.duplicate
    }

    /// Total notification attempts per record
    pub fn attempts_per_record(&self) -> u32 {
        self.duplicate + 1
    }
}

/// One webhook notification round: the changed records plus how to deliver them
#[derive(Debug, Clone)]
pub struct DispatchJob {
    pub id: JobId,
    pub config: DispatchConfig,
    pub changes: Vec<ChangeRecord>,
}

impl DispatchJob {
    pub fn new(config: DispatchConfig, changes: Vec<ChangeRecord>) -> Self {
        Self {
            id: JobId::new(),
            config,
            changes,
        }
    }

    /// Number of concurrency-bounded groups per duplicate pass
    pub fn group_count(&self) -> usize {
        self.changes.len().div_ceil(self.config.concurrency())
    }
}

/// Lifecycle of a dispatch job
///
/// `Pending → Dispatching{group: 0} → … → Dispatching{group: last} →
/// Completed`. Individual call failures never move a job backward or out
/// of `Dispatching`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Pending,
    Dispatching { group: usize },
    Completed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Pending => write!(f, "pending"),
            JobState::Dispatching { group } => write!(f, "dispatching(group={})", group),
            JobState::Completed => write!(f, "completed"),
        }
    }
}

/// Outcome of a single notification call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryOutcome {
    /// 2xx response from the target
    Delivered { status: u16 },
    /// Non-success status from the target
    Rejected { status: u16 },
    /// Call exceeded the per-call timeout
    TimedOut,
    /// Transport-level failure (connection refused, DNS, ...)
    Failed { reason: String },
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }
}

/// One logical notification attempt in a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryAttempt {
    pub stock_id: StockId,
    /// 1-based attempt number; > 1 for duplicates
    pub attempt: u32,
    pub outcome: DeliveryOutcome,
}

/// Per-attempt delivery outcomes for one dispatch job
///
/// A report is produced even when individual notifications failed;
/// dispatch-level failure is reserved for malformed job parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchReport {
    pub job_id: JobId,
    pub attempts: Vec<DeliveryAttempt>,
    pub groups_dispatched: usize,
}

impl DispatchReport {
    pub fn delivered_count(&self) -> usize {
        self.attempts
            .iter()
            .filter(|a| a.outcome.is_success())
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.attempts.len() - self.delivered_count()
    }

    /// Attempts for one stock, in attempt-number order
    pub fn attempts_for(&self, stock_id: StockId) -> Vec<&DeliveryAttempt> {
        let mut attempts: Vec<&DeliveryAttempt> = self
            .attempts
            .iter()
            .filter(|a| a.stock_id == stock_id)
            .collect();
        attempts.sort_by_key(|a| a.attempt);
        attempts
    }
}
