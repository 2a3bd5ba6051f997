use nestcare_core::db::migrations::{apply_migrations, latest_version};
use nestcare_core::db::{open_memory_db, DbError};
use rusqlite::Connection;

#[test]
fn open_memory_db_applies_all_migrations() {
    let conn = open_memory_db().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "activities");
    assert_table_exists(&conn, "growth_records");
    assert_table_exists(&conn, "hospital_visits");
    assert_table_exists(&conn, "shopping_items");
    assert_table_exists(&conn, "baby_profile");
}

#[test]
fn applying_migrations_twice_is_idempotent() {
    let mut conn = open_memory_db().unwrap();

    apply_migrations(&mut conn).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "activities");
}

#[test]
fn newer_schema_version_returns_error() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();

    let err = apply_migrations(&mut conn).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
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
