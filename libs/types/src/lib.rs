//! Types library for the stock mutation simulator
//!
//! This library provides all core type definitions shared between the
//! mutation engine and the HTTP gateway, ensuring type safety and a single
//! source of truth for the webhook payload schema.
//!
//! # Modules
//! - `ids`: Unique identifiers (StockId, JobId)
//! - `numeric`: Non-negative fixed-point price type
//! - `stock`: Stock record
//! - `change`: Change records and the webhook payload schema
//! - `dispatch`: Dispatch job, config, report, and state machine types
//! - `errors`: Error taxonomy

// Public modules
pub mod ids;
pub mod numeric;
pub mod stock;
pub mod change;
pub mod dispatch;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::stock::*;
    pub use crate::change::*;
    pub use crate::dispatch::*;
    pub use crate::errors::*;
}
