//! Key-value slot storage contracts and implementations.
//!
//! # Responsibility
//! - Provide the single-slot read/overwrite contract the snapshot adapter
//!   writes through.
//! - Isolate SQLite details from the persistence adapter.
//!
//! # Invariants
//! - `set` always overwrites; there is no merge or conflict detection.

pub mod kv_repo;
