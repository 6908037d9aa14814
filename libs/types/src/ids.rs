//! Unique identifier types for simulator entities
//!
//! Stocks use dense integer ids assigned at store initialization, matching
//! the boundary contract (CSV and webhook payloads carry plain integers).
//! Dispatch jobs use UUID v7 for time-sortable log correlation.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a stock
///
/// Ids are dense integers starting at 1, assigned when the store is
/// (re)initialized. They stay unique for the lifetime of one store
/// generation; re-initializing the store starts a fresh generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockId(u64);

impl StockId {
    /// Create from a raw integer
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw integer value
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for StockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StockId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Unique identifier for a dispatch job
///
/// Uses UUID v7 for time-based sorting, so job logs can be read back in
/// chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Create a new JobId with current timestamp
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create from existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get inner UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
