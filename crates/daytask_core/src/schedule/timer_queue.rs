//! Priority queue of armed one-shot timers.

use crate::model::task::TaskId;
use chrono::NaiveDateTime;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Effect run when a timer fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEffect {
    /// Clear completion flags and wipe the persisted list for the new day.
    DailyReset,
    /// Show a reminder for a task. Captures the name at arm time.
    Reminder { task_id: TaskId, task_name: String },
}

impl TimerEffect {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DailyReset => "daily_reset",
            Self::Reminder { .. } => "reminder",
        }
    }
}

/// One armed timer.
#[derive(Debug, Clone)]
pub struct ArmedTimer {
    pub fire_at: NaiveDateTime,
    pub seq: u64,
    pub effect: TimerEffect,
}

impl PartialEq for ArmedTimer {
    fn eq(&self, other: &Self) -> bool {
        self.fire_at == other.fire_at && self.seq == other.seq
    }
}

impl Eq for ArmedTimer {}

impl PartialOrd for ArmedTimer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ArmedTimer {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.fire_at, self.seq).cmp(&(other.fire_at, other.seq))
    }
}

/// Min-ordered queue of armed timers, drained by the controller.
#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Reverse<ArmedTimer>>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a one-shot timer and returns its sequence number.
    pub fn arm(&mut self, fire_at: NaiveDateTime, effect: TimerEffect) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(ArmedTimer {
            fire_at,
            seq,
            effect,
        }));
        seq
    }

    /// Earliest armed instant, if any timer is pending.
    pub fn next_fire_at(&self) -> Option<NaiveDateTime> {
        self.heap.peek().map(|Reverse(timer)| timer.fire_at)
    }

    /// Pops the earliest timer when it is due at `now`.
    pub fn pop_due(&mut self, now: NaiveDateTime) -> Option<ArmedTimer> {
        if self.next_fire_at()? > now {
            return None;
        }
        self.heap.pop().map(|Reverse(timer)| timer)
    }

    /// Pending timers in firing order.
    pub fn pending(&self) -> Vec<&ArmedTimer> {
        let mut timers = self
            .heap
            .iter()
            .map(|Reverse(timer)| timer)
            .collect::<Vec<_>>();
        timers.sort();
        timers
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{TimerEffect, TimerQueue};
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn reminder(id: u64) -> TimerEffect {
        TimerEffect::Reminder {
            task_id: id,
            task_name: format!("task {id}"),
        }
    }

    #[test]
    fn pops_in_fire_order_then_arm_order() {
        let mut queue = TimerQueue::new();
        queue.arm(at(10, 0), reminder(1));
        queue.arm(at(9, 0), reminder(2));
        queue.arm(at(10, 0), reminder(3));

        let now = at(12, 0);
        let order = std::iter::from_fn(|| queue.pop_due(now))
            .map(|timer| timer.effect)
            .collect::<Vec<_>>();
        assert_eq!(order, vec![reminder(2), reminder(1), reminder(3)]);
        assert!(queue.is_empty());
    }

    #[test]
    fn pop_due_leaves_future_timers() {
        let mut queue = TimerQueue::new();
        queue.arm(at(9, 0), TimerEffect::DailyReset);

        assert!(queue.pop_due(at(9, 0) - Duration::milliseconds(1)).is_none());
        assert_eq!(queue.len(), 1);
        assert!(queue.pop_due(at(9, 0)).is_some());
        assert_eq!(queue.next_fire_at(), None);
    }
}
