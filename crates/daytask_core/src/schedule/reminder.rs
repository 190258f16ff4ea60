//! Per-task reminder scheduling and delivery.
//!
//! # Invariants
//! - A reminder is armed only when today's target is strictly in the future;
//!   there is no next-day rollover and no immediate firing.
//! - Delivery checks permission at fire time and never retries.

use crate::model::task::{Task, TaskId};
use crate::notify::{Notification, NotificationPermission, Notifier};
use crate::schedule::timer_queue::{TimerEffect, TimerQueue};
use chrono::{Duration, NaiveDateTime};
use log::{debug, info, warn};

/// What happened when a reminder fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReminderDelivery {
    Shown,
    /// Permission was not granted at fire time.
    Suppressed(NotificationPermission),
    Failed(String),
}

/// Today's target instant for `task` when it is still ahead of `now`.
pub fn reminder_target(task: &Task, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let target = task.due_on(now.date());
    (target > now).then_some(target)
}

/// Arms a reminder for a freshly added task.
///
/// Returns the armed delay, or `None` when the time has already passed.
pub fn arm_reminder(
    timers: &mut TimerQueue,
    task: &Task,
    now: NaiveDateTime,
) -> Option<Duration> {
    let Some(target) = reminder_target(task, now) else {
        debug!(
            "event=reminder_arm module=schedule status=skip reason=time_passed task_id={}",
            task.id
        );
        return None;
    };

    let delay = target - now;
    timers.arm(
        target,
        TimerEffect::Reminder {
            task_id: task.id,
            task_name: task.name.clone(),
        },
    );
    info!(
        "event=reminder_arm module=schedule status=ok task_id={} delay_ms={}",
        task.id,
        delay.num_milliseconds()
    );
    Some(delay)
}

/// Notification shown for a task reminder.
pub fn reminder_notification(task_name: &str) -> Notification {
    Notification {
        title: format!("Reminder: {task_name}"),
        body: None,
    }
}

/// Fires one reminder through `notifier` if permission is granted.
pub fn deliver_reminder<N: Notifier + ?Sized>(
    notifier: &mut N,
    task_id: TaskId,
    task_name: &str,
) -> ReminderDelivery {
    let permission = notifier.permission();
    if permission != NotificationPermission::Granted {
        debug!(
            "event=reminder_fire module=schedule status=skip task_id={task_id} permission={}",
            permission.as_str()
        );
        return ReminderDelivery::Suppressed(permission);
    }

    match notifier.show(&reminder_notification(task_name)) {
        Ok(()) => {
            info!("event=reminder_fire module=schedule status=ok task_id={task_id}");
            ReminderDelivery::Shown
        }
        Err(err) => {
            warn!("event=reminder_fire module=schedule status=error task_id={task_id} error={err}");
            ReminderDelivery::Failed(err.to_string())
        }
    }
}
