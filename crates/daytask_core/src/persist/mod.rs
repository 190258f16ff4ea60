//! Daily snapshot persistence.
//!
//! # Responsibility
//! - Bridge the in-memory task list to one key-value slot scoped to "today".
//!
//! # Invariants
//! - A stored task list is only trusted when its date tag equals today's.
//! - Malformed stored data degrades to defaults and is never surfaced.

pub mod snapshot;
