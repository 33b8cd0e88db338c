//! Bulk snapshot of the whole store
//!
//! The snapshot document is the cross-device transfer shape: arrays of
//! all four entities with every field, applied on import as an atomic
//! overwrite. Serialization to files or clipboards is the caller's
//! business; this module only moves rows.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use serde::{Deserialize, Serialize};

use crate::db::StoreResult;
use crate::domain::{Attempt, Problem, Series, Subject};

pub const SNAPSHOT_SCHEMA_VERSION: u32 = 2;

/// Name of the subject synthesized when a legacy export has none.
pub const DEFAULT_SUBJECT_NAME: &str = "共通";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub schema_version: u32,
    pub exported_at: DateTime<Utc>,
    /// Absent in v1 exports, which predate subjects
    #[serde(default)]
    pub subjects: Vec<Subject>,
    pub series: Vec<Series>,
    pub problems: Vec<Problem>,
    pub attempts: Vec<Attempt>,
}

/// Dump every row, in insertion (id) order.
pub fn export_snapshot(conn: &Connection) -> StoreResult<Snapshot> {
    let mut subjects = crate::db::list_subjects(conn)?;
    subjects.sort_by_key(|s| s.id);
    let mut series = crate::db::list_all_series(conn)?;
    series.sort_by_key(|s| s.id);
    let mut problems = crate::db::list_all_problems(conn)?;
    problems.sort_by_key(|p| p.id);

    let mut stmt = conn.prepare("SELECT id FROM problems")?;
    let problem_ids = stmt
        .query_map([], |row| row.get::<_, i64>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    let mut attempts = Vec::new();
    for problem_id in problem_ids {
        attempts.extend(crate::db::list_attempts(conn, problem_id)?);
    }
    attempts.sort_by_key(|a| a.id);

    Ok(Snapshot {
        schema_version: SNAPSHOT_SCHEMA_VERSION,
        exported_at: Utc::now(),
        subjects,
        series,
        problems,
        attempts,
    })
}

/// Replace the entire store with the snapshot's rows, ids included, as a
/// single transaction. Nothing is kept from before; nothing is applied
/// on failure.
///
/// A v1 snapshot carries no subjects and its series omit subjectId; the
/// default subject (id 1) is synthesized and the series land under it.
pub fn import_snapshot(conn: &Connection, snapshot: &Snapshot) -> StoreResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute("DELETE FROM attempts", [])?;
    tx.execute("DELETE FROM problems", [])?;
    tx.execute("DELETE FROM series", [])?;
    tx.execute("DELETE FROM subjects", [])?;

    if snapshot.subjects.is_empty() {
        tx.execute(
            "INSERT INTO subjects (id, name, sort_order, created_at) VALUES (1, ?1, 0, ?2)",
            params![DEFAULT_SUBJECT_NAME, Utc::now().to_rfc3339()],
        )?;
    }
    for subject in &snapshot.subjects {
        tx.execute(
            "INSERT INTO subjects (id, name, sort_order, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                subject.id,
                subject.name,
                subject.sort_order,
                subject.created_at.to_rfc3339(),
            ],
        )?;
    }
    for series in &snapshot.series {
        tx.execute(
            "INSERT INTO series (id, subject_id, name, sort_order, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                series.id,
                series.subject_id,
                series.name,
                series.sort_order,
                series.created_at.to_rfc3339(),
            ],
        )?;
    }
    for problem in &snapshot.problems {
        tx.execute(
            "INSERT INTO problems (id, series_id, kind, number, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                problem.id,
                problem.series_id,
                problem.kind.as_str(),
                problem.number,
                problem.created_at.to_rfc3339(),
            ],
        )?;
    }
    for attempt in &snapshot.attempts {
        tx.execute(
            "INSERT INTO attempts (id, problem_id, attempt_no, done_date, minutes, score, result, created_at)
              VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                attempt.id,
                attempt.problem_id,
                attempt.attempt_no,
                attempt.done_date.to_string(),
                attempt.minutes,
                attempt.score,
                attempt.result.as_str(),
                attempt.created_at.to_rfc3339(),
            ],
        )?;
    }

    tx.commit()?;
    Ok(())
}
