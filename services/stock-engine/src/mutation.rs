//! Randomized price mutation
//!
//! Applies a bounded symmetric percentage drift to selected stocks. The
//! drift is drawn uniformly in ±`max_drift_bps` basis points, so the
//! property "new price stays within X% of the old price" holds regardless
//! of the RNG state. This is the sole writer of `price`/`last_updated`.

use chrono::Utc;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::change::ChangeRecord;
use types::ids::StockId;
use types::numeric::Price;

use crate::store::StockStore;

/// Configuration for the price drift distribution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Maximum absolute drift per mutation, in basis points (500 = ±5%)
    pub max_drift_bps: u32,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self { max_drift_bps: 500 }
    }
}

/// Applies randomized drift to stocks selected by the caller
pub struct MutationEngine {
    config: MutationConfig,
    rng: ChaCha8Rng,
}

impl MutationEngine {
    /// Create an engine with an entropy-seeded RNG
    pub fn new(config: MutationConfig) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Create an engine with a deterministic seed
    pub fn with_seed(config: MutationConfig, seed: u64) -> Self {
        Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Mutate the given stocks in place, emitting one change record each
    ///
    /// Output order matches input order. Stocks not named in `ids` are
    /// never touched. Prices are rounded to 2 dp and clamped at zero.
    pub fn mutate(&mut self, store: &mut StockStore, ids: &[StockId]) -> Vec<ChangeRecord> {
        let now = Utc::now();
        let max = i64::from(self.config.max_drift_bps);
        let mut changes = Vec::with_capacity(ids.len());

        for &id in ids {
            let drift_bps = self.rng.gen_range(-max..=max);
            let Some(stock) = store.get_mut(id) else {
                // Ids come from sampling the same store, so this is a
                // caller bug; release builds skip the id and keep going
                debug_assert!(false, "unknown stock id {id}");
                tracing::warn!(%id, "mutation skipped unknown stock id");
                continue;
            };

            let old_price = stock.price;
            let factor = Decimal::from(10_000 + drift_bps) / Decimal::from(10_000);
            let new_price = Price::clamped((old_price.as_decimal() * factor).round_dp(2));

            stock.price = new_price;
            stock.last_updated = now;

            changes.push(ChangeRecord {
                stock_id: id,
                symbol: stock.symbol.clone(),
                old_price,
                new_price,
                timestamp: now,
            });
        }

        changes
    }
}
