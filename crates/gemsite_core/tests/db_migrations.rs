use gemsite_core::db::migrations::latest_version;
use gemsite_core::db::{open_db, open_db_in_memory, DbError, OpenTarget};
use gemsite_core::{ContentRepository, SqliteContentRepository, StorageError};
use rusqlite::Connection;

#[test]
fn in_memory_database_has_kv_store() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "kv_store");
}

#[test]
fn reopening_a_file_keeps_schema_and_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gemsite.sqlite3");

    let first = open_db(&path).unwrap();
    let doc = gemsite_core::default_document()
        .update("hero.title", "Persisted")
        .unwrap();
    SqliteContentRepository::try_new(&first)
        .unwrap()
        .save_document(&doc)
        .unwrap();
    drop(first);

    let second = open_db(&path).unwrap();
    assert_eq!(schema_version(&second), latest_version());
    let loaded = SqliteContentRepository::try_new(&second)
        .unwrap()
        .load_document()
        .unwrap();
    assert_eq!(loaded, Some(doc));
}

#[test]
fn newer_schema_version_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
        DbError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn open_failure_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("gemsite.sqlite3");

    match open_db(&path).unwrap_err() {
        DbError::Open { target, .. } => assert_eq!(target, OpenTarget::File(path)),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    match SqliteContentRepository::try_new(&conn) {
        Err(StorageError::UninitializedConnection {
            expected_version,
            actual_version,
        }) => {
            assert_eq!(expected_version, latest_version());
            assert_eq!(actual_version, 0);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("unmigrated connection was accepted"),
    }
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1);",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
