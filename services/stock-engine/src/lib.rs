//! Stock mutation-and-dispatch engine
//!
//! Holds an in-memory collection of stock records, randomly perturbs a
//! requested subset on demand, and delivers one change notification per
//! (record, duplicate-attempt) pair to a webhook target under explicit
//! concurrency, pacing, and duplication controls.
//!
//! **Key Invariants:**
//! - Stock ids are unique within one store generation
//! - Prices never go negative (mutations clamp at zero)
//! - Sample + mutate for one trigger is atomic with respect to other
//!   triggers (single writer per trigger)
//! - Per-call delivery failures are reported, never retried, and never
//!   abort the batch
//!
//! # Modules
//! - `store` — In-memory stock arena with seeding and uniform sampling
//! - `mutation` — Bounded symmetric price drift
//! - `dispatch` — Grouped, paced, duplicated webhook delivery
//! - `simulator` — Lock-guarded facade composing the three

pub mod store;
pub mod mutation;
pub mod dispatch;
pub mod simulator;

pub use dispatch::{HttpSender, NotificationSender, WebhookDispatcher};
pub use mutation::{MutationConfig, MutationEngine};
pub use simulator::{Simulator, SimulatorConfig, TriggerOutcome, TriggerParams, WebhookParams};
pub use store::StockStore;
