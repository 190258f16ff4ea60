//! Snapshot adapter over a `KvStore` slot.
//!
//! Wire layout (single key `tasks`):
//! `{"date": "Fri Oct 16 2026", "tasks": [{"id", "name", "time": "HH:MM", "completed"}]}`

use crate::model::task::Task;
use crate::repo::kv_repo::{KvStore, RepoError};
use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key holding the daily snapshot.
pub const SNAPSHOT_KEY: &str = "tasks";

const DATE_TAG_FORMAT: &str = "%a %b %d %Y";

/// Formats a calendar date as a snapshot date tag (`Fri Oct 16 2026`).
pub fn date_tag(date: NaiveDate) -> String {
    date.format(DATE_TAG_FORMAT).to_string()
}

/// Persisted pairing of a date tag with the task list valid for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub date: String,
    pub tasks: Vec<Task>,
}

impl Snapshot {
    pub fn for_day(date: NaiveDate, tasks: Vec<Task>) -> Self {
        Self {
            date: date_tag(date),
            tasks,
        }
    }

    /// Decodes whatever is in the slot, falling back field by field.
    ///
    /// Returns `None` for the date when it is absent or not a string, and
    /// an empty list when `tasks` is absent or does not decode.
    pub fn decode_lenient(raw: &str) -> (Option<String>, Vec<Task>) {
        let Ok(Value::Object(mut fields)) = serde_json::from_str::<Value>(raw) else {
            return (None, Vec::new());
        };

        let date = match fields.remove("date") {
            Some(Value::String(date)) => Some(date),
            _ => None,
        };
        let tasks = match fields.remove("tasks") {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value(value).unwrap_or_else(|err| {
                warn!("event=snapshot_decode module=persist status=skip reason=bad_tasks error={err}");
                Vec::new()
            }),
        };
        (date, tasks)
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    date: String,
    tasks: &'a [Task],
}

/// Result of reading the slot against today's date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Stored date matches today; the list can hydrate the store.
    Current(Vec<Task>),
    /// Slot absent, malformed or tagged with another day.
    Stale { stored_date: Option<String> },
}

/// Error raised by a snapshot write.
#[derive(Debug)]
pub enum PersistError {
    Encode(serde_json::Error),
    Storage(RepoError),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
            Self::Storage(err) => write!(f, "failed to store snapshot: {err}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

impl From<RepoError> for PersistError {
    fn from(value: RepoError) -> Self {
        Self::Storage(value)
    }
}

/// Persistence adapter: reads and overwrites the daily snapshot slot.
///
/// Never mutates tasks; only serializes and deserializes them.
pub struct SnapshotStore<S: KvStore> {
    kv: S,
}

impl<S: KvStore> SnapshotStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Reads the raw slot contents leniently.
    ///
    /// Storage read failures are logged and treated as an empty slot.
    pub fn read(&self) -> (Option<String>, Vec<Task>) {
        match self.kv.get(SNAPSHOT_KEY) {
            Ok(Some(raw)) => Snapshot::decode_lenient(&raw),
            Ok(None) => (None, Vec::new()),
            Err(err) => {
                warn!("event=snapshot_read module=persist status=error error={err}");
                (None, Vec::new())
            }
        }
    }

    /// Reads the slot and checks its date tag against `today`.
    pub fn load(&self, today: NaiveDate) -> LoadOutcome {
        let (stored_date, tasks) = self.read();
        let today_tag = date_tag(today);
        if stored_date.as_deref() == Some(today_tag.as_str()) {
            debug!(
                "event=snapshot_load module=persist status=ok tasks={}",
                tasks.len()
            );
            return LoadOutcome::Current(tasks);
        }

        debug!(
            "event=snapshot_load module=persist status=stale stored_date={:?} today={today_tag}",
            stored_date
        );
        LoadOutcome::Stale { stored_date }
    }

    /// Overwrites the slot with `{date: today, tasks}`.
    pub fn write(&self, today: NaiveDate, tasks: &[Task]) -> Result<(), PersistError> {
        let payload = serde_json::to_string(&SnapshotRef {
            date: date_tag(today),
            tasks,
        })?;
        self.kv.set(SNAPSHOT_KEY, &payload)?;
        Ok(())
    }

    /// Overwrites the slot with `{date: today, tasks: []}`.
    pub fn clear(&self, today: NaiveDate) -> Result<(), PersistError> {
        self.write(today, &[])
    }
}

#[cfg(test)]
mod tests {
    use super::{date_tag, Snapshot};
    use chrono::NaiveDate;

    #[test]
    fn date_tag_matches_browser_date_string_shape() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        assert_eq!(date_tag(date), "Thu Oct 01 2026");
    }

    #[test]
    fn decode_lenient_falls_back_per_field() {
        assert_eq!(Snapshot::decode_lenient("not json"), (None, Vec::new()));
        assert_eq!(Snapshot::decode_lenient("[]"), (None, Vec::new()));

        let (date, tasks) = Snapshot::decode_lenient(r#"{"date":"Fri Oct 16 2026"}"#);
        assert_eq!(date.as_deref(), Some("Fri Oct 16 2026"));
        assert!(tasks.is_empty());

        let (date, tasks) =
            Snapshot::decode_lenient(r#"{"date":7,"tasks":[{"id":"x","name":1}]}"#);
        assert_eq!(date, None);
        assert!(tasks.is_empty());
    }
}
