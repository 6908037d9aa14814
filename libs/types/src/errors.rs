//! Error types for the stock mutation simulator
//!
//! Error taxonomy using thiserror. All configuration errors are raised
//! before any state change or network call.

use thiserror::Error;

/// Top-level engine error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid dispatch config: {0}")]
    InvalidDispatchConfig(#[from] DispatchConfigError),
}

/// Store-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Invalid amount: must be positive, got {amount}")]
    InvalidAmount { amount: i64 },

    #[error("Store is empty; initialize it first")]
    EmptyStore,

    #[error("Insufficient stock: requested {requested}, store holds {available}")]
    InsufficientStock { requested: usize, available: usize },
}

/// Dispatch configuration errors, validated before any network call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchConfigError {
    #[error("concurrency must be at least 1, got {concurrency}")]
    InvalidConcurrency { concurrency: usize },

    #[error("sleep must be a non-negative finite number of seconds, got {seconds}")]
    InvalidSleep { seconds: f64 },

    #[error("invalid webhook url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}
