//! Problem persistence: lazy creation and cascading deletion

use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};

use crate::db::{StoreError, StoreResult};
use crate::domain::{Problem, ProblemKind, ordering};
use crate::validation;

/// Return the problem id for (series, kind, number), inserting the row on
/// first use. INSERT OR IGNORE against the identity index keeps this
/// race-safe: concurrent callers for the same key create exactly one row.
pub fn get_or_create_problem(
    conn: &Connection,
    series_id: i64,
    kind: ProblemKind,
    number: Option<u32>,
) -> StoreResult<i64> {
    validation::problem_number(kind, number)?;
    if crate::db::get_series(conn, series_id)?.is_none() {
        return Err(StoreError::NotFound("series"));
    }

    let tx = conn.unchecked_transaction()?;
    tx.execute(
        "INSERT OR IGNORE INTO problems (series_id, kind, number, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![series_id, kind.as_str(), number, Utc::now().to_rfc3339()],
    )?;
    let id: i64 = tx.query_row(
        "SELECT id FROM problems
          WHERE series_id = ?1 AND kind = ?2 AND COALESCE(number, 0) = COALESCE(?3, 0)",
        params![series_id, kind.as_str(), number],
        |row| row.get(0),
    )?;
    tx.commit()?;
    Ok(id)
}

pub fn get_problem(conn: &Connection, id: i64) -> StoreResult<Option<Problem>> {
    let mut stmt = conn.prepare(
        "SELECT id, series_id, kind, number, created_at FROM problems WHERE id = ?1",
    )?;
    let mut rows = stmt.query(params![id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_problem(row)?))
    } else {
        Ok(None)
    }
}

/// Problems of one series in canonical order.
pub fn list_problems(conn: &Connection, series_id: i64) -> StoreResult<Vec<Problem>> {
    let mut stmt = conn.prepare(
        "SELECT id, series_id, kind, number, created_at FROM problems WHERE series_id = ?1",
    )?;
    let mut problems = stmt
        .query_map(params![series_id], row_to_problem)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    problems.sort_by(ordering::problem_order);
    Ok(problems)
}

/// Every problem in the store, for the due/upcoming assemblers.
pub fn list_all_problems(conn: &Connection) -> StoreResult<Vec<Problem>> {
    let mut stmt =
        conn.prepare("SELECT id, series_id, kind, number, created_at FROM problems")?;
    let problems = stmt
        .query_map([], row_to_problem)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(problems)
}

/// Delete a problem and all of its attempts as one unit. Missing ids are
/// a no-op; no orphaned attempts survive either way.
pub fn delete_problem(conn: &Connection, id: i64) -> StoreResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM attempts WHERE problem_id = ?1", params![id])?;
    tx.execute("DELETE FROM problems WHERE id = ?1", params![id])?;
    tx.commit()?;
    Ok(())
}

fn row_to_problem(row: &rusqlite::Row) -> rusqlite::Result<Problem> {
    let kind_str: String = row.get(2)?;
    let created_at_str: String = row.get(4)?;
    Ok(Problem {
        id: row.get(0)?,
        series_id: row.get(1)?,
        kind: ProblemKind::from_str(&kind_str).unwrap_or(ProblemKind::Problem),
        number: row.get(3)?,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}
