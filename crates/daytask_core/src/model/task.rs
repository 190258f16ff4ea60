//! Task domain model.
//!
//! # Responsibility
//! - Define the record rendered by the presentation layer and persisted in
//!   the daily snapshot.
//! - Parse and format the `HH:MM` time-of-day carried by every task.
//!
//! # Invariants
//! - `id` is assigned once at creation and never changes.
//! - `completed` only moves from `false` to `true` through `mark_completed`;
//!   the daily reset is the single path that clears it.
//! - `time` has no date component and is always read against "today".

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Stable identifier of one task within a day.
pub type TaskId = u64;

/// Wall-clock time of day with minute precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskTime {
    hour: u8,
    minute: u8,
}

/// Reason a time-of-day string could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskTimeError {
    Empty,
    Malformed(String),
    OutOfRange { hour: u32, minute: u32 },
}

impl Display for TaskTimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "time of day is empty"),
            Self::Malformed(value) => write!(f, "expected `HH:MM`, got `{value}`"),
            Self::OutOfRange { hour, minute } => {
                write!(f, "time of day {hour}:{minute:02} is out of range")
            }
        }
    }
}

impl Error for TaskTimeError {}

impl TaskTime {
    /// Builds a time of day, rejecting values outside `00:00..=23:59`.
    pub fn new(hour: u32, minute: u32) -> Result<Self, TaskTimeError> {
        if hour > 23 || minute > 59 {
            return Err(TaskTimeError::OutOfRange { hour, minute });
        }
        Ok(Self {
            hour: hour as u8,
            minute: minute as u8,
        })
    }

    pub fn hour(self) -> u32 {
        u32::from(self.hour)
    }

    pub fn minute(self) -> u32 {
        u32::from(self.minute)
    }

    pub fn as_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or(NaiveTime::MIN)
    }

    /// Anchors this time of day on `date` at second zero.
    pub fn on(self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.as_naive_time())
    }
}

impl Display for TaskTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TaskTime {
    type Err = TaskTimeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.is_empty() {
            return Err(TaskTimeError::Empty);
        }

        let malformed = || TaskTimeError::Malformed(value.to_string());
        let (hour_text, minute_text) = value.split_once(':').ok_or_else(malformed)?;
        if hour_text.is_empty()
            || hour_text.len() > 2
            || minute_text.len() != 2
            || !hour_text.bytes().all(|b| b.is_ascii_digit())
            || !minute_text.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }

        let hour = hour_text.parse::<u32>().map_err(|_| malformed())?;
        let minute = minute_text.parse::<u32>().map_err(|_| malformed())?;
        Self::new(hour, minute)
    }
}

impl Serialize for TaskTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TaskTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// One entry of the daily to-do list.
///
/// Field names match the persisted snapshot layout
/// (`{id, name, time: "HH:MM", completed}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub time: TaskTime,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Creates a pending task.
    pub fn new(id: TaskId, name: impl Into<String>, time: TaskTime) -> Self {
        Self {
            id,
            name: name.into(),
            time,
            completed: false,
        }
    }

    /// Marks the task done. Returns `false` when it already was.
    pub fn mark_completed(&mut self) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        true
    }

    /// Target instant of this task on `date`.
    pub fn due_on(&self, date: NaiveDate) -> NaiveDateTime {
        self.time.on(date)
    }
}

#[cfg(test)]
mod tests {
    use super::{Task, TaskTime, TaskTimeError};

    #[test]
    fn parses_zero_padded_and_short_hours() {
        assert_eq!("09:00".parse::<TaskTime>().unwrap(), TaskTime::new(9, 0).unwrap());
        assert_eq!("7:05".parse::<TaskTime>().unwrap(), TaskTime::new(7, 5).unwrap());
        assert_eq!("23:59".parse::<TaskTime>().unwrap().to_string(), "23:59");
    }

    #[test]
    fn rejects_empty_malformed_and_out_of_range() {
        assert_eq!("".parse::<TaskTime>().unwrap_err(), TaskTimeError::Empty);
        assert!(matches!(
            "9am".parse::<TaskTime>().unwrap_err(),
            TaskTimeError::Malformed(_)
        ));
        assert!(matches!(
            "09:5".parse::<TaskTime>().unwrap_err(),
            TaskTimeError::Malformed(_)
        ));
        assert_eq!(
            "24:00".parse::<TaskTime>().unwrap_err(),
            TaskTimeError::OutOfRange {
                hour: 24,
                minute: 0
            }
        );
    }

    #[test]
    fn mark_completed_only_flips_once() {
        let mut task = Task::new(1, "Write report", TaskTime::new(9, 0).unwrap());
        assert!(task.mark_completed());
        assert!(!task.mark_completed());
        assert!(task.completed);
    }
}
