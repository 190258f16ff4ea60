use daytask_core::db::schema::current_version;
use daytask_core::db::{open_db, open_db_in_memory, DbError};
use daytask_core::{KvStore, SqliteKvStore};
use rusqlite::Connection;

#[test]
fn in_memory_store_is_created_at_the_current_layout() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), current_version());
    assert_table_exists(&conn, "kv_slots");
}

#[test]
fn slots_survive_reopening_the_same_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("daytask.sqlite3");

    let conn_first = open_db(&path).unwrap();
    SqliteKvStore::new(&conn_first).set("tasks", "first").unwrap();
    SqliteKvStore::new(&conn_first).set("tasks", "second").unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), current_version());
    let store = SqliteKvStore::new(&conn_second);
    assert_eq!(store.get("tasks").unwrap().as_deref(), Some("second"));
    assert_eq!(store.get("other").unwrap(), None);
}

#[test]
fn file_from_a_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(err.to_string().contains("written by a newer daytask"));
    match err {
        DbError::SchemaFromNewerBuild { found, known } => {
            assert_eq!(found, 999);
            assert_eq!(known, current_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn), 999);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
