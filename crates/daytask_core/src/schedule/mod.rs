//! Deterministic timer scheduling.
//!
//! # Responsibility
//! - Hold armed one-shot timers as `(fire_at, effect)` pairs.
//! - Compute the midnight reset and per-task reminder instants.
//!
//! # Invariants
//! - Timers fire in `fire_at` order; ties fire in the order they were armed.
//! - Armed timers cannot be cancelled or rescheduled.

pub mod daily_reset;
pub mod reminder;
pub mod timer_queue;
