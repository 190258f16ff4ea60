//! Terminal rendering and the console notification sink.

use daytask_core::{
    Notice, NoticeLevel, Notification, NotificationPermission, Notifier, NotifyError, Task,
};
use std::io::Write;

/// Prints reminders to stdout.
///
/// Starts unasked; the prompt is answered by the `--no-notify` flag.
pub struct ConsoleNotifier {
    permission: NotificationPermission,
    muted: bool,
}

impl ConsoleNotifier {
    pub fn new(muted: bool) -> Self {
        Self {
            permission: NotificationPermission::Default,
            muted,
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn permission(&self) -> NotificationPermission {
        self.permission
    }

    fn request_permission(&mut self) -> NotificationPermission {
        self.permission = if self.muted {
            NotificationPermission::Denied
        } else {
            NotificationPermission::Granted
        };
        self.permission
    }

    fn show(&mut self, notification: &Notification) -> Result<(), NotifyError> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "\x07[reminder] {}", notification.title)
            .and_then(|()| stdout.flush())
            .map_err(|err| NotifyError::Delivery(err.to_string()))
    }
}

pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Error => eprintln!("[{}] {}", notice.level.as_str(), notice.message),
            NoticeLevel::Success | NoticeLevel::Info => {
                println!("[{}] {}", notice.level.as_str(), notice.message)
            }
        }
    }
}

pub fn print_tasks(tasks: &[Task]) {
    if tasks.is_empty() {
        println!("No tasks for today.");
        return;
    }
    for task in tasks {
        println!("{}", format_task(task));
    }
}

fn format_task(task: &Task) -> String {
    let mark = if task.completed { 'x' } else { ' ' };
    format!("[{mark}] {}  {}  {}", task.id, task.time, task.name)
}
