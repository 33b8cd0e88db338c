//! Shared test helpers.

use rusqlite::Connection;

use crate::db::schema::run_migrations;

/// Fresh in-memory store with the full schema applied.
pub fn memory_conn() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory db");
    run_migrations(&conn).expect("run migrations");
    conn
}
