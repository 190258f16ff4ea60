//! Core logic for the daily to-do list.
//! This crate is the single source of truth for task, reset and reminder rules.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod persist;
pub mod repo;
pub mod schedule;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::notice::{Notice, NoticeLevel};
pub use model::task::{Task, TaskId, TaskTime, TaskTimeError};
pub use notify::{MemoryNotifier, Notification, NotificationPermission, Notifier, NotifyError};
pub use persist::snapshot::{
    date_tag, LoadOutcome, PersistError, Snapshot, SnapshotStore, SNAPSHOT_KEY,
};
pub use repo::kv_repo::{KvStore, MemoryKvStore, RepoError, RepoResult, SqliteKvStore};
pub use schedule::timer_queue::{ArmedTimer, TimerEffect, TimerQueue};
pub use service::planner::{DayPlanner, StartReport};
pub use service::task_store::{AddTaskError, TaskStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
