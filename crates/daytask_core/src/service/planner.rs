//! Day planner controller.
//!
//! # Responsibility
//! - Own the whole session state: task store, snapshot adapter, timers,
//!   notifier, clock and pending notices.
//! - Turn user intents into store mutations followed by write-through.
//! - Drain due timers deterministically for tests and real-time drivers.
//!
//! # Invariants
//! - Every store change is written through before the intent returns.
//! - Storage and delivery failures are logged, never raised to the user.
//! - The midnight timer re-arms itself after each reset.

use crate::clock::Clock;
use crate::model::notice::Notice;
use crate::model::task::{Task, TaskId};
use crate::notify::{ensure_permission, NotificationPermission, Notifier};
use crate::persist::snapshot::{LoadOutcome, SnapshotStore};
use crate::repo::kv_repo::KvStore;
use crate::schedule::daily_reset::{arm_daily_reset, reset_day};
use crate::schedule::reminder::{arm_reminder, deliver_reminder};
use crate::schedule::timer_queue::{ArmedTimer, TimerEffect, TimerQueue};
use crate::service::task_store::{AddTaskError, TaskStore};
use chrono::{NaiveDate, NaiveDateTime};
use log::{info, warn};

const COMPLETED_NOTICE: &str = "Task marked as done!";
const DELETED_NOTICE: &str = "Task deleted.";

/// Summary of session start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartReport {
    /// Tasks restored from today's snapshot.
    pub hydrated: usize,
    /// Whether the stored snapshot was stale and got reset.
    pub reset: bool,
    pub permission: NotificationPermission,
    pub next_reset_at: Option<NaiveDateTime>,
}

/// Session controller for the daily to-do list.
pub struct DayPlanner<S: KvStore, N: Notifier, C: Clock> {
    store: TaskStore,
    snapshots: SnapshotStore<S>,
    timers: TimerQueue,
    notifier: N,
    clock: C,
    notices: Vec<Notice>,
    started: bool,
}

impl<S: KvStore, N: Notifier, C: Clock> DayPlanner<S, N, C> {
    pub fn new(kv: S, notifier: N, clock: C) -> Self {
        Self {
            store: TaskStore::new(),
            snapshots: SnapshotStore::new(kv),
            timers: TimerQueue::new(),
            notifier,
            clock,
            notices: Vec::new(),
            started: false,
        }
    }

    /// Loads today's snapshot, asks for notification consent and arms the
    /// midnight reset.
    ///
    /// A stale or missing snapshot triggers the daily reset instead of
    /// hydration. Calling this again is a no-op that reports current state.
    pub fn start(&mut self) -> StartReport {
        if self.started {
            warn!("event=planner_start module=service status=skip reason=already_started");
            return StartReport {
                hydrated: 0,
                reset: false,
                permission: self.notifier.permission(),
                next_reset_at: self.next_reset_at(),
            };
        }
        self.started = true;

        let now = self.clock.now();
        let today = now.date();
        let (hydrated, reset) = match self.snapshots.load(today) {
            LoadOutcome::Current(tasks) => {
                let count = tasks.len();
                self.store.hydrate(tasks);
                (count, false)
            }
            LoadOutcome::Stale { .. } => {
                self.run_daily_reset(today);
                (0, true)
            }
        };

        let permission = ensure_permission(&mut self.notifier);
        let next_reset_at = arm_daily_reset(&mut self.timers, now);

        info!(
            "event=planner_start module=service status=ok hydrated={hydrated} reset={reset} permission={}",
            permission.as_str()
        );
        StartReport {
            hydrated,
            reset,
            permission,
            next_reset_at,
        }
    }

    /// Adds a task and arms its reminder when the time is still ahead.
    ///
    /// # Errors
    /// Returns the rejection and queues an error notice; nothing else changes.
    pub fn add_task(&mut self, name: &str, time: &str) -> Result<Task, AddTaskError> {
        let now = self.clock.now();
        let task = match self.store.add(name, time, now) {
            Ok(task) => task,
            Err(err) => {
                warn!("event=task_add module=service status=error error={err:?}");
                self.notices.push(Notice::error(err.to_string()));
                return Err(err);
            }
        };

        self.write_through(now.date());
        arm_reminder(&mut self.timers, &task, now);
        info!(
            "event=task_add module=service status=ok task_id={} time={}",
            task.id, task.time
        );
        Ok(task)
    }

    /// Marks a task done. Unknown or already-done ids change nothing.
    pub fn complete_task(&mut self, id: TaskId) -> bool {
        let changed = self.store.complete(id);
        if changed {
            self.write_through(self.clock.today());
        }
        info!("event=task_complete module=service status=ok task_id={id} changed={changed}");
        self.notices.push(Notice::success(COMPLETED_NOTICE));
        changed
    }

    /// Removes a task. Its reminder, if armed, still fires.
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let removed = self.store.delete(id);
        if removed {
            self.write_through(self.clock.today());
        }
        info!("event=task_delete module=service status=ok task_id={id} removed={removed}");
        self.notices.push(Notice::info(DELETED_NOTICE));
        removed
    }

    /// Fires every timer due at `now`, earliest first.
    ///
    /// Each effect runs as of its own `fire_at`, so advancing across several
    /// midnights fires one reset per day.
    pub fn run_due(&mut self, now: NaiveDateTime) -> Vec<ArmedTimer> {
        let mut fired = Vec::new();
        while let Some(timer) = self.timers.pop_due(now) {
            self.fire(&timer);
            fired.push(timer);
        }
        fired
    }

    /// Fires every timer due at the clock's current instant.
    pub fn tick(&mut self) -> Vec<ArmedTimer> {
        let now = self.clock.now();
        self.run_due(now)
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.store.get(id)
    }

    /// Takes all notices queued since the last drain.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn next_fire_at(&self) -> Option<NaiveDateTime> {
        self.timers.next_fire_at()
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn snapshots(&self) -> &SnapshotStore<S> {
        &self.snapshots
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn next_reset_at(&self) -> Option<NaiveDateTime> {
        self.timers
            .pending()
            .into_iter()
            .find(|timer| timer.effect == TimerEffect::DailyReset)
            .map(|timer| timer.fire_at)
    }

    fn fire(&mut self, timer: &ArmedTimer) {
        match &timer.effect {
            TimerEffect::DailyReset => {
                self.run_daily_reset(timer.fire_at.date());
                arm_daily_reset(&mut self.timers, timer.fire_at);
            }
            TimerEffect::Reminder { task_id, task_name } => {
                deliver_reminder(&mut self.notifier, *task_id, task_name);
            }
        }
    }

    fn run_daily_reset(&mut self, today: NaiveDate) {
        if let Err(err) = reset_day(&mut self.store, &self.snapshots, today) {
            warn!("event=daily_reset module=service status=error error={err}");
        }
    }

    fn write_through(&self, today: NaiveDate) {
        if let Err(err) = self.snapshots.write(today, self.store.tasks()) {
            warn!("event=snapshot_write module=service status=error error={err}");
        }
    }
}
