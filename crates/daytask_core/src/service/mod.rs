//! Session services.
//!
//! # Responsibility
//! - Hold the in-memory task list and its mutation rules.
//! - Orchestrate store, snapshot, timers and notifier behind one controller
//!   so presentation layers never touch storage directly.

pub mod planner;
pub mod task_store;
