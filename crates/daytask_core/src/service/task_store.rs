//! In-memory task store.
//!
//! # Responsibility
//! - Own the ordered task list for the current session.
//! - Validate add input and assign ids.
//!
//! # Invariants
//! - Append order is display order; delete preserves the order of the rest.
//! - Ids are strictly increasing within a store, even when several tasks are
//!   added in the same millisecond.
//! - Issued ids never exceed `MAX_TASK_ID`, so they survive a round trip
//!   through any JSON reader that stores numbers as doubles.

use crate::clock::epoch_millis;
use crate::model::task::{Task, TaskId, TaskTime, TaskTimeError};
use chrono::NaiveDateTime;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejection reasons for `TaskStore::add`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddTaskError {
    /// Name or time was left empty.
    EmptyInput,
    /// Time was given but is not a valid `HH:MM`.
    InvalidTime(TaskTimeError),
    /// No id at or below `MAX_TASK_ID` is left to issue.
    IdsExhausted,
}

impl Display for AddTaskError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "Please provide task details and time."),
            Self::InvalidTime(err) => write!(f, "Invalid task time: {err}."),
            Self::IdsExhausted => write!(f, "No task ids are left; delete a task first."),
        }
    }
}

impl Error for AddTaskError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyInput | Self::IdsExhausted => None,
            Self::InvalidTime(err) => Some(err),
        }
    }
}

/// Largest id handed out: `2^53 - 1`, the top of the exactly representable
/// integer range of an IEEE double.
pub const MAX_TASK_ID: TaskId = (1 << 53) - 1;

/// Timestamp-derived id source that never repeats.
///
/// Issues `max(now_ms, last + 1)`, capped at `MAX_TASK_ID`.
#[derive(Debug, Clone, Default)]
pub struct TaskIdGenerator {
    last: TaskId,
}

impl TaskIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes sure future ids are above `id`.
    ///
    /// Ids above `MAX_TASK_ID` can never be issued again, so they do not
    /// move the generator.
    pub fn observe(&mut self, id: TaskId) {
        if id <= MAX_TASK_ID {
            self.last = self.last.max(id);
        }
    }

    /// Returns `None` once `MAX_TASK_ID` has been issued or observed.
    pub fn next_id(&mut self, now: NaiveDateTime) -> Option<TaskId> {
        let stamp = TaskId::try_from(epoch_millis(now)).unwrap_or(0);
        let id = stamp.max(self.last.checked_add(1)?);
        if id > MAX_TASK_ID {
            return None;
        }
        self.last = id;
        Some(id)
    }
}

/// Ordered, session-scoped task list.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    ids: TaskIdGenerator,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the list with tasks read from a snapshot.
    pub fn hydrate(&mut self, tasks: Vec<Task>) {
        for task in &tasks {
            self.ids.observe(task.id);
        }
        self.tasks = tasks;
    }

    /// Appends a new pending task.
    ///
    /// # Errors
    /// - `EmptyInput` when `name` or `time` is empty; nothing changes.
    /// - `InvalidTime` when `time` is not `HH:MM`; nothing changes.
    /// - `IdsExhausted` when no id is left; nothing changes.
    pub fn add(
        &mut self,
        name: &str,
        time: &str,
        now: NaiveDateTime,
    ) -> Result<Task, AddTaskError> {
        if name.is_empty() || time.is_empty() {
            return Err(AddTaskError::EmptyInput);
        }
        let time = time.parse::<TaskTime>().map_err(AddTaskError::InvalidTime)?;

        let id = self.ids.next_id(now).ok_or(AddTaskError::IdsExhausted)?;
        let task = Task::new(id, name, time);
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Marks a task done. Returns whether anything changed.
    pub fn complete(&mut self, id: TaskId) -> bool {
        self.tasks
            .iter_mut()
            .find(|task| task.id == id)
            .is_some_and(Task::mark_completed)
    }

    /// Removes a task. Returns whether it was present.
    pub fn delete(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    /// Clears every completion flag. Returns how many were set.
    pub fn reset_all(&mut self) -> usize {
        let mut cleared = 0;
        for task in self.tasks.iter_mut().filter(|task| task.completed) {
            task.completed = false;
            cleared += 1;
        }
        cleared
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{AddTaskError, Task, TaskIdGenerator, TaskStore, MAX_TASK_ID};
    use chrono::{NaiveDate, NaiveDateTime};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn same_millisecond_ids_do_not_collide() {
        let mut ids = TaskIdGenerator::new();
        let first = ids.next_id(now()).unwrap();
        let second = ids.next_id(now()).unwrap();
        assert_eq!(second, first + 1);
    }

    #[test]
    fn hydrated_ids_seed_the_generator() {
        let mut store = TaskStore::new();
        let far_future = Task::new(MAX_TASK_ID - 1, "future", "10:00".parse().unwrap());
        store.hydrate(vec![far_future]);

        let added = store.add("next", "11:00", now()).unwrap();
        assert_eq!(added.id, MAX_TASK_ID);
        assert_eq!(
            store.add("after", "12:00", now()),
            Err(AddTaskError::IdsExhausted)
        );
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn out_of_range_hydrated_id_keeps_new_ids_distinct() {
        let mut store = TaskStore::new();
        store.hydrate(vec![Task::new(u64::MAX, "legacy", "10:00".parse().unwrap())]);

        let first = store.add("first", "11:00", now()).unwrap();
        let second = store.add("second", "12:00", now()).unwrap();
        assert_ne!(first.id, second.id);
        assert!(first.id <= MAX_TASK_ID && second.id <= MAX_TASK_ID);

        assert!(store.delete(first.id));
        let names = store
            .tasks()
            .iter()
            .map(|task| task.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["legacy", "second"]);
    }

    #[test]
    fn invalid_time_is_distinct_from_empty_input() {
        let mut store = TaskStore::new();
        assert_eq!(store.add("", "09:00", now()), Err(AddTaskError::EmptyInput));
        assert_eq!(store.add("a", "", now()), Err(AddTaskError::EmptyInput));
        assert!(matches!(
            store.add("a", "25:00", now()),
            Err(AddTaskError::InvalidTime(_))
        ));
        assert!(store.is_empty());
    }
}
