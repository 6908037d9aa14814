//! Stock record type

use crate::ids::StockId;
use crate::numeric::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A simulated market instrument
///
/// `id` and `symbol` are immutable after creation. `price` and
/// `last_updated` are written only by the mutation engine, which stamps
/// both together on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub id: StockId,
    pub symbol: String,
    pub price: Price,
    pub last_updated: DateTime<Utc>,
}

impl Stock {
    pub fn new(id: StockId, symbol: String, price: Price, last_updated: DateTime<Utc>) -> Self {
        Self {
            id,
            symbol,
            price,
            last_updated,
        }
    }
}
