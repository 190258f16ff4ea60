//! Interactive session: reads intents from stdin while timers fire.
//!
//! Stdin is read on a helper thread; every planner call stays on the main
//! thread.

use crate::{apply, TaskCommand};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use daytask_core::{Clock, DayPlanner, KvStore, Notifier};
use log::{debug, info};
use std::io::BufRead;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

/// Upper bound on one wait, so a suspended machine catches up soon after
/// waking.
const MAX_WAIT: Duration = Duration::from_secs(30);

#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct SessionLine {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Debug, Subcommand)]
enum SessionCommand {
    #[command(flatten)]
    Task(TaskCommand),
    /// End the session.
    Quit,
}

pub fn run<S, N, C>(planner: &mut DayPlanner<S, N, C>) -> std::io::Result<()>
where
    S: KvStore,
    N: Notifier,
    C: Clock,
{
    let (tx, rx) = mpsc::channel::<String>();
    thread::Builder::new()
        .name("daytask-stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        })?;

    println!("Session started. Type `help` for commands, `quit` to leave.");
    crate::console::print_tasks(planner.tasks());
    info!("event=session_start module=cli status=ok");

    loop {
        let fired = planner.tick();
        if !fired.is_empty() {
            debug!("event=session_tick module=cli status=ok fired={}", fired.len());
        }

        let wait = wait_until(planner.next_fire_at(), planner.clock().now());
        let line = match rx.recv_timeout(wait) {
            Ok(line) => line,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        };

        let words = line.split_whitespace().collect::<Vec<_>>();
        if words.is_empty() {
            continue;
        }
        match SessionLine::try_parse_from(words) {
            Ok(SessionLine {
                command: SessionCommand::Quit,
            }) => break,
            Ok(SessionLine {
                command: SessionCommand::Task(command),
            }) => {
                if handle_command(planner, &command) {
                    crate::console::print_tasks(planner.tasks());
                }
            }
            Err(err) => {
                let _ = err.print();
            }
        }
    }

    info!("event=session_end module=cli status=ok");
    Ok(())
}

/// Fires anything that fell due while waiting for input, then applies the
/// command, so a late midnight reset never lands after the user's intent.
fn handle_command<S, N, C>(planner: &mut DayPlanner<S, N, C>, command: &TaskCommand) -> bool
where
    S: KvStore,
    N: Notifier,
    C: Clock,
{
    let fired = planner.tick();
    if !fired.is_empty() {
        debug!(
            "event=session_catch_up module=cli status=ok fired={}",
            fired.len()
        );
    }
    apply(planner, command)
}

fn wait_until(next_fire_at: Option<NaiveDateTime>, now: NaiveDateTime) -> Duration {
    next_fire_at
        .map(|at| (at - now).to_std().unwrap_or(Duration::ZERO))
        .map_or(MAX_WAIT, |wait| wait.min(MAX_WAIT))
}
