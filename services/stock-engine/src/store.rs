//! In-memory stock store
//!
//! Dense arena of stock records with bulk (re)initialization and uniform
//! sampling without replacement. The store owns a seeded RNG so a whole
//! simulation run can be reproduced from one seed.

use chrono::Utc;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use types::errors::StoreError;
use types::ids::StockId;
use types::numeric::Price;
use types::stock::Stock;

/// Initial price range in cents: [1.00, 500.00]
const MIN_INITIAL_CENTS: i64 = 100;
const MAX_INITIAL_CENTS: i64 = 50_000;

/// In-memory stock arena
///
/// Ids are dense: stock `i` (0-based) has id `i + 1`, so lookup is index
/// arithmetic. Re-initialization discards all prior state and restarts ids
/// at 1, starting a fresh store generation.
pub struct StockStore {
    stocks: Vec<Stock>,
    rng: ChaCha8Rng,
}

impl StockStore {
    /// Create an empty store with an entropy-seeded RNG
    pub fn new() -> Self {
        Self {
            stocks: Vec::new(),
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Create an empty store with a deterministic seed
    pub fn with_seed(seed: u64) -> Self {
        Self {
            stocks: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Replace the store contents with `amount` freshly generated stocks
    ///
    /// Each stock gets a random ticker-style symbol and a random price in
    /// [1.00, 500.00]. Prior state is fully discarded, never merged.
    pub fn initialize(&mut self, amount: usize) -> Result<(), StoreError> {
        if amount == 0 {
            return Err(StoreError::InvalidAmount { amount: 0 });
        }

        let now = Utc::now();
        self.stocks.clear();
        self.stocks.reserve(amount);

        for i in 0..amount {
            let id = StockId::new(i as u64 + 1);
            let symbol = self.random_symbol(id);
            let cents = self.rng.gen_range(MIN_INITIAL_CENTS..=MAX_INITIAL_CENTS);
            let price = Price::new(Decimal::new(cents, 2));
            self.stocks.push(Stock::new(id, symbol, price, now));
        }

        Ok(())
    }

    /// Draw `k` distinct stock ids uniformly without replacement
    pub fn sample(&mut self, k: usize) -> Result<Vec<StockId>, StoreError> {
        if self.stocks.is_empty() {
            return Err(StoreError::EmptyStore);
        }
        if k > self.stocks.len() {
            return Err(StoreError::InsufficientStock {
                requested: k,
                available: self.stocks.len(),
            });
        }

        let indices = rand::seq::index::sample(&mut self.rng, self.stocks.len(), k);
        Ok(indices
            .into_iter()
            .map(|i| StockId::new(i as u64 + 1))
            .collect())
    }

    /// Current stock count
    pub fn size(&self) -> usize {
        self.stocks.len()
    }

    /// Look up a stock by id
    pub fn get(&self, id: StockId) -> Option<&Stock> {
        let idx = id.as_u64().checked_sub(1)? as usize;
        self.stocks.get(idx)
    }

    /// Mutable lookup, used by the mutation engine only
    pub(crate) fn get_mut(&mut self, id: StockId) -> Option<&mut Stock> {
        let idx = id.as_u64().checked_sub(1)? as usize;
        self.stocks.get_mut(idx)
    }

    /// All stocks in id order
    pub fn stocks(&self) -> &[Stock] {
        &self.stocks
    }

    /// Four random uppercase letters plus the id, unique per generation
    fn random_symbol(&mut self, id: StockId) -> String {
        let letters: String = (0..4)
            .map(|_| (b'A' + self.rng.gen_range(0..26)) as char)
            .collect();
        format!("{}{:04}", letters, id.as_u64())
    }
}

impl Default for StockStore {
    fn default() -> Self {
        Self::new()
    }
}
