//! Change records and the webhook payload schema
//!
//! A `ChangeRecord` is an immutable snapshot of one price mutation event.
//! `WebhookPayload` is the explicit wire schema posted to webhook targets;
//! defining it here keeps the boundary typed instead of passing an untyped
//! record through.

use crate::ids::StockId;
use crate::numeric::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable snapshot of one price mutation
///
/// Produced by the mutation engine, consumed by the dispatcher or returned
/// to the caller. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub stock_id: StockId,
    pub symbol: String,
    pub old_price: Price,
    pub new_price: Price,
    pub timestamp: DateTime<Utc>,
}

/// Wire schema for one webhook notification body
///
/// One payload is posted per (record, duplicate-attempt) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub id: StockId,
    pub symbol: String,
    pub price: Price,
    pub previous_price: Price,
    pub modified_since: DateTime<Utc>,
}

impl From<&ChangeRecord> for WebhookPayload {
    fn from(record: &ChangeRecord) -> Self {
        Self {
            id: record.stock_id,
            symbol: record.symbol.clone(),
            price: record.new_price,
            previous_price: record.old_price,
            modified_since: record.timestamp,
        }
    }
}
