//! Attempt lifecycle: insert, edit, delete, renumber
//!
//! attempt_no is assigned as max + 1 and never reuses a number freed by
//! deletion; the explicit renumber operation is the only way to compact
//! the sequence back to a dense 1..n run.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};

use crate::db::{StoreError, StoreResult};
use crate::domain::{Attempt, AttemptResult, ordering};
use crate::validation;

/// Editable fields of an attempt, used for both insert and update.
#[derive(Debug, Clone)]
pub struct AttemptInput {
    pub attempt_no: u32,
    pub done_date: chrono::NaiveDate,
    pub minutes: Option<u32>,
    pub score: Option<f64>,
    pub result: AttemptResult,
}

/// Attempts of one problem in canonical history order.
pub fn list_attempts(conn: &Connection, problem_id: i64) -> StoreResult<Vec<Attempt>> {
    let mut stmt = conn.prepare(
        "SELECT id, problem_id, attempt_no, done_date, minutes, score, result, created_at
          FROM attempts WHERE problem_id = ?1",
    )?;
    let mut attempts = stmt
        .query_map(params![problem_id], row_to_attempt)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    attempts.sort_by(ordering::attempt_order);
    Ok(attempts)
}

pub fn get_attempt(conn: &Connection, id: i64) -> StoreResult<Option<Attempt>> {
    let mut stmt = conn.prepare(
        "SELECT id, problem_id, attempt_no, done_date, minutes, score, result, created_at
          FROM attempts WHERE id = ?1",
    )?;
    let mut rows = stmt.query(params![id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_attempt(row)?))
    } else {
        Ok(None)
    }
}

/// 1 for a fresh problem, max + 1 otherwise.
pub fn next_attempt_no(conn: &Connection, problem_id: i64) -> StoreResult<u32> {
    let next: i64 = conn.query_row(
        "SELECT COALESCE(MAX(attempt_no), 0) + 1 FROM attempts WHERE problem_id = ?1",
        params![problem_id],
        |row| row.get(0),
    )?;
    Ok(next as u32)
}

/// Insert one attempt. A clash on attempt_no or done_date within the
/// problem fails with `Duplicate` via the unique indexes; nothing is
/// written in that case.
pub fn insert_attempt(
    conn: &Connection,
    problem_id: i64,
    input: &AttemptInput,
) -> StoreResult<i64> {
    validation::attempt_no(input.attempt_no)?;
    validation::minutes(input.minutes)?;
    if crate::db::get_problem(conn, problem_id)?.is_none() {
        return Err(StoreError::NotFound("problem"));
    }

    conn.execute(
        "INSERT INTO attempts (problem_id, attempt_no, done_date, minutes, score, result, created_at)
          VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            problem_id,
            input.attempt_no,
            input.done_date.to_string(),
            input.minutes,
            input.score,
            input.result.as_str(),
            Utc::now().to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Replace the editable fields of an attempt. The new attempt_no and
/// done_date are pre-checked against all other attempts of the same
/// problem; the read-then-write is not atomic against a second writer,
/// but the unique indexes still backstop it. Refreshes created_at.
pub fn update_attempt(conn: &Connection, attempt_id: i64, input: &AttemptInput) -> StoreResult<()> {
    validation::attempt_no(input.attempt_no)?;
    validation::minutes(input.minutes)?;

    let Some(current) = get_attempt(conn, attempt_id)? else {
        return Err(StoreError::NotFound("attempt"));
    };

    let others = list_attempts(conn, current.problem_id)?;
    for other in others.iter().filter(|a| a.id != attempt_id) {
        if other.attempt_no == input.attempt_no {
            return Err(StoreError::Duplicate(format!(
                "attempt {} already recorded for this problem",
                input.attempt_no
            )));
        }
        if other.done_date == input.done_date {
            return Err(StoreError::Duplicate(format!(
                "an attempt on {} already exists for this problem",
                input.done_date
            )));
        }
    }

    conn.execute(
        "UPDATE attempts
          SET attempt_no = ?1, done_date = ?2, minutes = ?3, score = ?4, result = ?5, created_at = ?6
          WHERE id = ?7",
        params![
            input.attempt_no,
            input.done_date.to_string(),
            input.minutes,
            input.score,
            input.result.as_str(),
            Utc::now().to_rfc3339(),
            attempt_id,
        ],
    )?;
    Ok(())
}

/// Unconditional removal; a missing id is a silent no-op. Remaining
/// attempts keep their numbers.
pub fn delete_attempt(conn: &Connection, attempt_id: i64) -> StoreResult<()> {
    conn.execute("DELETE FROM attempts WHERE id = ?1", params![attempt_id])?;
    Ok(())
}

/// Reassign the attempt ordinals of one problem to the dense sequence
/// 1..n in (done_date, id) order. User-invoked repair for when deletions
/// or edits have left gaps; idempotent.
pub fn renumber_attempts(conn: &Connection, problem_id: i64) -> StoreResult<()> {
    let mut attempts = list_attempts(conn, problem_id)?;
    attempts.sort_by(ordering::history_order);

    let tx = conn.unchecked_transaction()?;
    // Park every row on a unique negative ordinal first so the final
    // assignment never collides with the (problem_id, attempt_no) index.
    tx.execute(
        "UPDATE attempts SET attempt_no = -id WHERE problem_id = ?1",
        params![problem_id],
    )?;
    for (i, attempt) in attempts.iter().enumerate() {
        tx.execute(
            "UPDATE attempts SET attempt_no = ?1 WHERE id = ?2",
            params![(i + 1) as i64, attempt.id],
        )?;
    }
    tx.commit()?;
    Ok(())
}

fn row_to_attempt(row: &rusqlite::Row) -> rusqlite::Result<Attempt> {
    let done_date_str: String = row.get(3)?;
    let result_str: String = row.get(6)?;
    let created_at_str: String = row.get(7)?;

    Ok(Attempt {
        id: row.get(0)?,
        problem_id: row.get(1)?,
        attempt_no: row.get(2)?,
        done_date: done_date_str
            .parse()
            .unwrap_or_else(|_| Utc::now().date_naive()),
        minutes: row.get(4)?,
        score: row.get(5)?,
        result: AttemptResult::from_str(&result_str).unwrap_or(AttemptResult::Poor),
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}
