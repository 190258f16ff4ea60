//! Slot table layout, one SQL step per schema version.
//!
//! Step `n` (1-based) upgrades a file from version `n - 1` to `n`. Steps are
//! append-only; a shipped step is never edited.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

const STEPS: &[&str] = &[
    // v1: one row per slot, overwritten in place.
    "CREATE TABLE IF NOT EXISTS kv_slots (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL,
        updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
    );",
];

/// Layout version this build writes.
pub fn current_version() -> u32 {
    // Bounded by the handful of steps above.
    STEPS.len() as u32
}

/// Version recorded in the file, `0` for a fresh one.
pub fn stored_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}

/// Runs the missing steps in one transaction and stamps the new version.
pub fn upgrade(conn: &mut Connection) -> DbResult<()> {
    let found = stored_version(conn)?;
    let known = current_version();
    if found > known {
        return Err(DbError::SchemaFromNewerBuild { found, known });
    }
    if found == known {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for sql in &STEPS[found as usize..] {
        tx.execute_batch(sql)?;
    }
    tx.execute_batch(&format!("PRAGMA user_version = {known};"))?;
    tx.commit()?;

    info!("event=db_upgrade module=db status=ok from={found} to={known}");
    Ok(())
}
