use chrono::Utc;
use rusqlite::{Connection, Result, params};

pub fn run_migrations(conn: &Connection) -> Result<()> {
    // Create tables with COMPLETE schema for new databases
    // Migrations below handle upgrades for existing databases
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS subjects (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS series (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            subject_id INTEGER NOT NULL DEFAULT 1 REFERENCES subjects(id),
            name TEXT NOT NULL,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            UNIQUE (subject_id, name)
        );

        CREATE TABLE IF NOT EXISTS problems (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            series_id INTEGER NOT NULL REFERENCES series(id),
            kind TEXT NOT NULL,
            number INTEGER,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS attempts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            problem_id INTEGER NOT NULL REFERENCES problems(id),
            attempt_no INTEGER NOT NULL,
            done_date TEXT NOT NULL,
            minutes INTEGER,
            score REAL,
            result TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE (problem_id, attempt_no),
            UNIQUE (problem_id, done_date)
        );

        -- Problem identity: (series, kind, number) with a missing number
        -- standing in as 0, so unnumbered kinds are unique per series too
        CREATE UNIQUE INDEX IF NOT EXISTS idx_problems_identity
            ON problems(series_id, kind, COALESCE(number, 0));

        -- Indexes
        CREATE INDEX IF NOT EXISTS idx_series_subject ON series(subject_id);
        CREATE INDEX IF NOT EXISTS idx_problems_series ON problems(series_id);
        CREATE INDEX IF NOT EXISTS idx_attempts_problem ON attempts(problem_id);
        CREATE INDEX IF NOT EXISTS idx_attempts_date ON attempts(done_date);
        "#,
    )?;

    // ============================================================
    // MIGRATIONS FOR EXISTING DATABASES
    // These are no-ops for new databases (columns already exist)
    // ============================================================

    // Migration: v1 databases predate subjects. Attach their series to a
    // default subject so the (subject_id, name) identity holds.
    let had_subject_id = column_exists(conn, "series", "subject_id");
    add_column_if_missing(conn, "series", "subject_id", "INTEGER NOT NULL DEFAULT 1")?;
    if !had_subject_id {
        conn.execute(
            "INSERT OR IGNORE INTO subjects (id, name, sort_order, created_at) VALUES (1, '共通', 0, ?1)",
            params![Utc::now().to_rfc3339()],
        )?;
    }

    Ok(())
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    conn
        .prepare(&format!("SELECT {} FROM {} LIMIT 1", column, table))
        .is_ok()
}

/// Add a column if it doesn't already exist
fn add_column_if_missing(
    conn: &Connection,
    table: &str,
    column: &str,
    column_def: &str,
) -> Result<()> {
    if !column_exists(conn, table, column) {
        conn.execute(
            &format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, column_def),
            [],
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();
    }

    #[test]
    fn test_v1_series_table_gains_subject_column() {
        let conn = Connection::open_in_memory().unwrap();
        // A v1 database has series without subject_id and no subjects at all.
        conn
            .execute_batch(
                r#"
                CREATE TABLE series (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    sort_order INTEGER NOT NULL DEFAULT 0,
                    created_at TEXT NOT NULL
                );
                INSERT INTO series (name, created_at) VALUES ('1-1', '2023-01-01T00:00:00Z');
                "#,
            )
            .unwrap();

        run_migrations(&conn).unwrap();

        let subject_id: i64 = conn
            .query_row("SELECT subject_id FROM series WHERE name = '1-1'", [], |row| row.get(0))
            .unwrap();
        assert_eq!(subject_id, 1);

        let default_name: String = conn
            .query_row("SELECT name FROM subjects WHERE id = 1", [], |row| row.get(0))
            .unwrap();
        assert_eq!(default_name, "共通");
    }
}
