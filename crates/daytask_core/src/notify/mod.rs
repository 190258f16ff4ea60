//! Permission-gated local notification boundary.
//!
//! # Responsibility
//! - Model the platform's three-state notification consent.
//! - Define the sink that displays a notification.
//!
//! # Invariants
//! - Permission is only requested while it is still `Default`; an explicit
//!   denial is never re-prompted.
//! - Delivery is best-effort; nothing is queued or retried.

use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Platform notification consent state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPermission {
    /// Never asked.
    Default,
    Granted,
    Denied,
}

impl NotificationPermission {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Granted => "granted",
            Self::Denied => "denied",
        }
    }
}

/// A notification ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// The platform has no notification facility.
    Unavailable,
    Delivery(String),
}

impl Display for NotifyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "notifications are unavailable"),
            Self::Delivery(message) => write!(f, "notification delivery failed: {message}"),
        }
    }
}

impl Error for NotifyError {}

/// Local notification sink.
pub trait Notifier {
    fn permission(&self) -> NotificationPermission;

    /// Prompts for consent and returns the resulting state.
    fn request_permission(&mut self) -> NotificationPermission;

    fn show(&mut self, notification: &Notification) -> Result<(), NotifyError>;
}

/// Requests permission once if it has never been asked.
pub fn ensure_permission<N: Notifier + ?Sized>(notifier: &mut N) -> NotificationPermission {
    let current = notifier.permission();
    if current != NotificationPermission::Default {
        return current;
    }

    let answered = notifier.request_permission();
    info!(
        "event=notify_permission module=notify status=ok result={}",
        answered.as_str()
    );
    answered
}

/// In-process notifier that records what it was asked to show.
#[derive(Debug, Clone)]
pub struct MemoryNotifier {
    permission: NotificationPermission,
    answer: NotificationPermission,
    requests: u32,
    shown: Vec<Notification>,
}

impl MemoryNotifier {
    /// `permission` is the initial state; `answer` is what a prompt yields.
    pub fn new(permission: NotificationPermission, answer: NotificationPermission) -> Self {
        Self {
            permission,
            answer,
            requests: 0,
            shown: Vec::new(),
        }
    }

    pub fn granted() -> Self {
        Self::new(NotificationPermission::Granted, NotificationPermission::Granted)
    }

    pub fn requests(&self) -> u32 {
        self.requests
    }

    pub fn shown(&self) -> &[Notification] {
        &self.shown
    }

    pub fn set_permission(&mut self, permission: NotificationPermission) {
        self.permission = permission;
    }
}

impl Notifier for MemoryNotifier {
    fn permission(&self) -> NotificationPermission {
        self.permission
    }

    fn request_permission(&mut self) -> NotificationPermission {
        self.requests += 1;
        self.permission = self.answer;
        self.permission
    }

    fn show(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        self.shown.push(notification.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ensure_permission, MemoryNotifier, NotificationPermission};

    #[test]
    fn default_permission_is_requested_once() {
        let mut notifier = MemoryNotifier::new(
            NotificationPermission::Default,
            NotificationPermission::Granted,
        );

        assert_eq!(ensure_permission(&mut notifier), NotificationPermission::Granted);
        assert_eq!(ensure_permission(&mut notifier), NotificationPermission::Granted);
        assert_eq!(notifier.requests(), 1);
    }

    #[test]
    fn denied_permission_is_never_reprompted() {
        let mut notifier = MemoryNotifier::new(
            NotificationPermission::Denied,
            NotificationPermission::Granted,
        );

        assert_eq!(ensure_permission(&mut notifier), NotificationPermission::Denied);
        assert_eq!(notifier.requests(), 0);
    }
}
