//! Fixed-point price type
//!
//! Uses rust_decimal for deterministic arithmetic (no floating-point
//! errors). Prices are never negative: construction rejects or clamps
//! negative values, so the invariant holds by type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-negative stock price
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a price, panicking on negative input
    ///
    /// # Panics
    /// Panics if `value` is negative. Use `try_new` or `clamped` when the
    /// input is not known to be valid.
    pub fn new(value: Decimal) -> Self {
        assert!(!value.is_sign_negative(), "Price must be non-negative");
        Self(value)
    }

    /// Try to create a price, returning None on negative input
    pub fn try_new(value: Decimal) -> Option<Self> {
        if value.is_sign_negative() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Create a price, clamping negative input to zero
    ///
    /// This is the mutation-path constructor: a drift that would drive the
    /// price below zero lands exactly at zero.
    pub fn clamped(value: Decimal) -> Self {
        if value.is_sign_negative() {
            Self(Decimal::ZERO)
        } else {
            Self(value)
        }
    }

    /// Zero price
    pub fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// Create from a whole-unit integer
    pub fn from_u64(value: u64) -> Self {
        Self(Decimal::from(value))
    }

    /// Get the inner decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Whether this price is exactly zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
