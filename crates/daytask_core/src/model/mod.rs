//! Domain model for the daily to-do list.
//!
//! # Responsibility
//! - Define the task record shared by the store, the snapshot and the
//!   reminder scheduler.
//! - Define feedback notices consumed by the presentation layer.
//!
//! # Invariants
//! - Every task is identified by a stable `TaskId`.
//! - Deletion is a hard removal; there are no tombstones.

pub mod notice;
pub mod task;
