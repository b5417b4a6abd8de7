use rusqlite::{params, Connection};
use wintally_core::db::migrations::latest_version;
use wintally_core::db::{open_db, open_db_in_memory, schema_version, DbError};
use wintally_core::{LedgerService, SqliteLedgerRepository};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_eq!(latest_version(), 2);
    assert_table_exists(&conn, "ledger_blobs");
}

#[test]
fn open_db_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("ledger.sqlite3");

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert!(path.exists());
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.sqlite3");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO ledger_blobs (key, value) VALUES ('scratch', '[]');",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second).unwrap(), latest_version());
    let kept: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM ledger_blobs;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(kept, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
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
fn v1_ledger_with_legacy_keys_is_upgraded_and_readable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.sqlite3");

    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE ledger_blobs (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL DEFAULT 0
            );
            PRAGMA user_version = 1;",
        )
        .unwrap();
        insert_blob(
            &conn,
            "cutting_edge_results_records_v1",
            r#"[{"id":"11111111-2222-4333-8444-555555555555","amount":-300,"date":"2024-02-01","type":"桥牌"}]"#,
        );
        insert_blob(&conn, "cutting_edge_results_categories_v1", r#"["麻将","桥牌"]"#);
    }

    let mut conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), 2);
    assert_eq!(
        blob_keys(&conn),
        vec!["categories_v1".to_string(), "records_v1".to_string()]
    );

    let store = LedgerService::load(SqliteLedgerRepository::new(&mut conn));
    assert_eq!(store.records().len(), 1);
    assert_eq!(store.records()[0].amount, -300.0);
    let labels: Vec<&str> = store.categories().iter().collect();
    assert_eq!(labels, vec!["麻将", "桥牌"]);
}

#[test]
fn legacy_key_does_not_replace_an_existing_current_blob() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("both.sqlite3");

    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(include_str!("../src/db/migrations/0001_init.sql"))
            .unwrap();
        conn.execute_batch("PRAGMA user_version = 1;").unwrap();
        insert_blob(&conn, "categories_v1", r#"["current"]"#);
        insert_blob(&conn, "cutting_edge_results_categories_v1", r#"["legacy"]"#);
    }

    let conn = open_db(&path).unwrap();
    let value: String = conn
        .query_row(
            "SELECT value FROM ledger_blobs WHERE key = 'categories_v1';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(value, r#"["current"]"#);
}

fn insert_blob(conn: &Connection, key: &str, value: &str) {
    conn.execute(
        "INSERT INTO ledger_blobs (key, value) VALUES (?1, ?2);",
        params![key, value],
    )
    .unwrap();
}

fn blob_keys(conn: &Connection) -> Vec<String> {
    let mut stmt = conn
        .prepare("SELECT key FROM ledger_blobs ORDER BY key;")
        .unwrap();
    let keys = stmt
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<Vec<String>, _>>()
        .unwrap();
    keys
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
