use chrono::{NaiveDate, NaiveDateTime};
use daytask_core::{
    date_tag, DayPlanner, KvStore, ManualClock, MemoryNotifier, Notice, RepoError, RepoResult,
    TimerEffect, SNAPSHOT_KEY,
};
use serde_json::json;
use std::cell::Cell;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    day().and_hms_opt(hour, minute, 0).unwrap()
}

fn midnight_after(date: NaiveDate) -> NaiveDateTime {
    date.succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap()
}

/// Serves a fixed slot and rejects every write, like a full or locked disk.
struct ReadOnlyKvStore {
    slot: Option<String>,
    rejected_writes: Cell<usize>,
}

impl ReadOnlyKvStore {
    fn new(slot: Option<String>) -> Self {
        Self {
            slot,
            rejected_writes: Cell::new(0),
        }
    }
}

impl KvStore for ReadOnlyKvStore {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        Ok(self.slot.clone().filter(|_| key == SNAPSHOT_KEY))
    }

    fn set(&self, _key: &str, _value: &str) -> RepoResult<()> {
        self.rejected_writes.set(self.rejected_writes.get() + 1);
        Err(RepoError::InvalidKey)
    }
}

#[test]
fn intents_still_apply_when_every_write_fails() {
    let kv = ReadOnlyKvStore::new(None);
    let mut planner = DayPlanner::new(&kv, MemoryNotifier::granted(), ManualClock::new(at(8, 0)));
    let report = planner.start();
    assert!(report.reset);

    let task = planner.add_task("Write report", "09:00").unwrap();
    assert!(planner.complete_task(task.id));
    assert!(planner.task(task.id).unwrap().completed);
    assert!(planner.delete_task(task.id));
    assert!(planner.tasks().is_empty());

    assert_eq!(
        planner.drain_notices(),
        vec![
            Notice::success("Task marked as done!"),
            Notice::info("Task deleted.")
        ]
    );
    assert!(kv.rejected_writes.get() >= 4);
}

#[test]
fn midnight_reset_clears_flags_and_rearms_when_the_wipe_fails() {
    let today = json!({
        "date": date_tag(day()),
        "tasks": [{"id": 1, "name": "Stretch", "time": "07:00", "completed": true}]
    });
    let kv = ReadOnlyKvStore::new(Some(today.to_string()));
    let mut planner = DayPlanner::new(&kv, MemoryNotifier::granted(), ManualClock::new(at(8, 0)));
    assert_eq!(planner.start().hydrated, 1);

    let midnight = midnight_after(day());
    let fired = planner.run_due(midnight);
    assert_eq!(fired.len(), 1);
    assert_eq!(fired[0].effect, TimerEffect::DailyReset);
    assert!(kv.rejected_writes.get() >= 1);

    assert!(!planner.task(1).unwrap().completed);
    assert_eq!(
        planner.next_fire_at(),
        Some(midnight_after(midnight.date()))
    );
}
