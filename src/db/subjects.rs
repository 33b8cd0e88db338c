//! Subject persistence and reordering

use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};

use crate::db::StoreResult;
use crate::domain::{Subject, ordering};
use crate::validation;

pub fn insert_subject(conn: &Connection, name: &str) -> StoreResult<i64> {
    validation::subject_name(name)?;
    let name = name.trim();

    let sort_order: i64 = conn.query_row(
        "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM subjects",
        [],
        |row| row.get(0),
    )?;
    conn.execute(
        "INSERT INTO subjects (name, sort_order, created_at) VALUES (?1, ?2, ?3)",
        params![name, sort_order, Utc::now().to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_subject(conn: &Connection, id: i64) -> StoreResult<Option<Subject>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, sort_order, created_at FROM subjects WHERE id = ?1",
    )?;
    let mut rows = stmt.query(params![id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_subject(row)?))
    } else {
        Ok(None)
    }
}

/// All subjects in canonical order.
pub fn list_subjects(conn: &Connection) -> StoreResult<Vec<Subject>> {
    let mut stmt = conn.prepare("SELECT id, name, sort_order, created_at FROM subjects")?;
    let mut subjects = stmt
        .query_map([], row_to_subject)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    subjects.sort_by(ordering::subject_order);
    Ok(subjects)
}

/// Swap a subject with its list neighbor (direction -1 or +1) and
/// renormalize every sort_order to its list index. No-op at either
/// boundary and for unknown ids.
pub fn move_subject(conn: &Connection, id: i64, direction: i64) -> StoreResult<()> {
    let mut all = list_subjects(conn)?;
    let Some(idx) = all.iter().position(|s| s.id == id) else {
        return Ok(());
    };
    let target = idx as i64 + direction;
    if target < 0 || target >= all.len() as i64 {
        return Ok(());
    }
    all.swap(idx, target as usize);

    let tx = conn.unchecked_transaction()?;
    for (i, subject) in all.iter().enumerate() {
        tx.execute(
            "UPDATE subjects SET sort_order = ?1 WHERE id = ?2",
            params![i as i64, subject.id],
        )?;
    }
    tx.commit()?;
    Ok(())
}

fn row_to_subject(row: &rusqlite::Row) -> rusqlite::Result<Subject> {
    let created_at_str: String = row.get(3)?;
    Ok(Subject {
        id: row.get(0)?,
        name: row.get(1)?,
        sort_order: row.get(2)?,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}
