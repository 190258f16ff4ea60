//! Command-line front end for the daily to-do list.
//!
//! # Responsibility
//! - Resolve configuration, open slot storage and start one planner session.
//! - Forward add/complete/delete intents and render tasks and notices.

mod console;
mod session;

use clap::{Parser, Subcommand};
use console::{print_notices, print_tasks, ConsoleNotifier};
use daytask_core::db::open_db;
use daytask_core::{
    init_logging, AppConfig, Clock, ConfigError, DayPlanner, KvStore, Notifier, SqliteKvStore,
    SystemClock, TaskId,
};
use log::info;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "daytask", version, about = "Daily to-do list that resets at midnight")]
struct Cli {
    /// SQLite file holding today's tasks (env: DAYTASK_DB_PATH).
    #[arg(long)]
    db: Option<PathBuf>,
    /// trace|debug|info|warn|error (env: DAYTASK_LOG_LEVEL).
    #[arg(long)]
    log_level: Option<String>,
    /// Absolute directory for rolling log files (env: DAYTASK_LOG_DIR).
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// Decline the notification prompt.
    #[arg(long)]
    no_notify: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(flatten)]
    Task(TaskCommand),
    /// Keep running, firing reminders and the midnight reset while reading
    /// commands from stdin.
    Session,
}

/// Intents shared by one-shot invocations and session input.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub(crate) enum TaskCommand {
    /// Show today's tasks.
    List,
    /// Add a task: `add 09:00 Write report`.
    Add {
        time: String,
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },
    /// Mark a task as done.
    Done { id: TaskId },
    /// Delete a task.
    Rm { id: TaskId },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("daytask: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    let config = resolve_config(&cli)?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir)?;
    }

    let conn = open_db(&config.db_path)?;
    let mut planner = DayPlanner::new(
        SqliteKvStore::new(&conn),
        ConsoleNotifier::new(cli.no_notify),
        SystemClock,
    );
    let report = planner.start();
    info!(
        "event=cli_start module=cli status=ok db_path={} reset={}",
        config.db_path.display(),
        report.reset
    );

    match cli.command {
        Command::Task(command) => {
            let ok = apply(&mut planner, &command);
            if !ok {
                return Ok(ExitCode::FAILURE);
            }
            if command != TaskCommand::List {
                println!();
            }
            print_tasks(planner.tasks());
            Ok(ExitCode::SUCCESS)
        }
        Command::Session => {
            session::run(&mut planner)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Applies one intent and prints the notices it produced.
///
/// Returns `false` when the intent was rejected.
pub(crate) fn apply<S, N, C>(planner: &mut DayPlanner<S, N, C>, command: &TaskCommand) -> bool
where
    S: KvStore,
    N: Notifier,
    C: Clock,
{
    let ok = match command {
        TaskCommand::List => true,
        TaskCommand::Add { time, name } => planner.add_task(&name.join(" "), time).is_ok(),
        TaskCommand::Done { id } => {
            planner.complete_task(*id);
            true
        }
        TaskCommand::Rm { id } => {
            planner.delete_task(*id);
            true
        }
    };
    print_notices(&planner.drain_notices());
    ok
}

fn resolve_config(cli: &Cli) -> Result<AppConfig, ConfigError> {
    let mut config = AppConfig::load()?;
    if let Some(db) = &cli.db {
        config.db_path = db.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    Ok(config)
}
