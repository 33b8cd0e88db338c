//! Series persistence, reordering and the quick-record lookup

use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};

use crate::db::{StoreError, StoreResult};
use crate::domain::{Series, ordering};
use crate::validation;

pub fn insert_series(conn: &Connection, subject_id: i64, name: &str) -> StoreResult<i64> {
    validation::series_name(name)?;
    if crate::db::get_subject(conn, subject_id)?.is_none() {
        return Err(StoreError::NotFound("subject"));
    }
    let name = name.trim();

    let sort_order: i64 = conn.query_row(
        "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM series WHERE subject_id = ?1",
        params![subject_id],
        |row| row.get(0),
    )?;
    conn.execute(
        "INSERT INTO series (subject_id, name, sort_order, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![subject_id, name, sort_order, Utc::now().to_rfc3339()],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Find a series by (subject, name), creating it at the end of the
/// subject's list when missing. Used by the quick-record path.
pub fn get_or_create_series(conn: &Connection, subject_id: i64, name: &str) -> StoreResult<i64> {
    validation::series_name(name)?;
    let name = name.trim();

    let mut stmt =
        conn.prepare("SELECT id FROM series WHERE subject_id = ?1 AND name = ?2")?;
    let mut rows = stmt.query(params![subject_id, name])?;
    if let Some(row) = rows.next()? {
        return Ok(row.get(0)?);
    }
    insert_series(conn, subject_id, name)
}

pub fn get_series(conn: &Connection, id: i64) -> StoreResult<Option<Series>> {
    let mut stmt = conn.prepare(
        "SELECT id, subject_id, name, sort_order, created_at FROM series WHERE id = ?1",
    )?;
    let mut rows = stmt.query(params![id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_series(row)?))
    } else {
        Ok(None)
    }
}

/// Series of one subject in canonical order.
pub fn list_series(conn: &Connection, subject_id: i64) -> StoreResult<Vec<Series>> {
    let mut stmt = conn.prepare(
        "SELECT id, subject_id, name, sort_order, created_at FROM series WHERE subject_id = ?1",
    )?;
    let mut series = stmt
        .query_map(params![subject_id], row_to_series)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    series.sort_by(ordering::series_order);
    Ok(series)
}

/// All series across subjects, for the due/upcoming assemblers.
pub fn list_all_series(conn: &Connection) -> StoreResult<Vec<Series>> {
    let mut stmt =
        conn.prepare("SELECT id, subject_id, name, sort_order, created_at FROM series")?;
    let series = stmt
        .query_map([], row_to_series)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(series)
}

/// Swap a series with its neighbor within the subject and renormalize
/// the sibling list. No-op at either boundary and for unknown ids.
pub fn move_series(conn: &Connection, subject_id: i64, id: i64, direction: i64) -> StoreResult<()> {
    let mut siblings = list_series(conn, subject_id)?;
    let Some(idx) = siblings.iter().position(|s| s.id == id) else {
        return Ok(());
    };
    let target = idx as i64 + direction;
    if target < 0 || target >= siblings.len() as i64 {
        return Ok(());
    }
    siblings.swap(idx, target as usize);

    let tx = conn.unchecked_transaction()?;
    for (i, series) in siblings.iter().enumerate() {
        tx.execute(
            "UPDATE series SET sort_order = ?1 WHERE id = ?2",
            params![i as i64, series.id],
        )?;
    }
    tx.commit()?;
    Ok(())
}

fn row_to_series(row: &rusqlite::Row) -> rusqlite::Result<Series> {
    let created_at_str: String = row.get(4)?;
    Ok(Series {
        id: row.get(0)?,
        subject_id: row.get(1)?,
        name: row.get(2)?,
        sort_order: row.get(3)?,
        created_at: DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::insert_subject;
    use crate::testing::memory_conn;

    fn subject(conn: &Connection) -> i64 {
        insert_subject(conn, "消費税法").unwrap()
    }

    #[test]
    fn test_insert_appends_within_subject() {
        let conn = memory_conn();
        let subject_id = subject(&conn);
        insert_series(&conn, subject_id, "1-1").unwrap();
        insert_series(&conn, subject_id, "1-2").unwrap();
        let list = list_series(&conn, subject_id).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "1-1");
        assert_eq!(list[1].sort_order, 1);
    }

    #[test]
    fn test_same_name_allowed_across_subjects() {
        let conn = memory_conn();
        let a = insert_subject(&conn, "a").unwrap();
        let b = insert_subject(&conn, "b").unwrap();
        insert_series(&conn, a, "1-1").unwrap();
        insert_series(&conn, b, "1-1").unwrap();
        assert_eq!(list_series(&conn, a).unwrap().len(), 1);
        assert_eq!(list_series(&conn, b).unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_name_within_subject_rejected() {
        let conn = memory_conn();
        let subject_id = subject(&conn);
        insert_series(&conn, subject_id, "第2回").unwrap();
        let err = insert_series(&conn, subject_id, "第2回").unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[test]
    fn test_insert_under_missing_subject_rejected() {
        let conn = memory_conn();
        let err = insert_series(&conn, 42, "1-1").unwrap_err();
        assert!(matches!(err, StoreError::NotFound("subject")));
    }

    #[test]
    fn test_get_or_create_returns_existing() {
        let conn = memory_conn();
        let subject_id = subject(&conn);
        let first = get_or_create_series(&conn, subject_id, "1-1").unwrap();
        let second = get_or_create_series(&conn, subject_id, "1-1").unwrap();
        assert_eq!(first, second);
        assert_eq!(list_series(&conn, subject_id).unwrap().len(), 1);
    }

    #[test]
    fn test_get_or_create_appends_new_at_end() {
        let conn = memory_conn();
        let subject_id = subject(&conn);
        insert_series(&conn, subject_id, "1-1").unwrap();
        let id = get_or_create_series(&conn, subject_id, "第2回").unwrap();
        let list = list_series(&conn, subject_id).unwrap();
        assert_eq!(list[1].id, id);
        assert_eq!(list[1].sort_order, 1);
    }

    #[test]
    fn test_move_interior_swaps_exactly_two() {
        let conn = memory_conn();
        let subject_id = subject(&conn);
        let ids: Vec<i64> = ["a", "b", "c", "d"]
            .iter()
            .map(|n| insert_series(&conn, subject_id, n).unwrap())
            .collect();

        move_series(&conn, subject_id, ids[2], -1).unwrap();
        let after: Vec<i64> = list_series(&conn, subject_id)
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(after, vec![ids[0], ids[2], ids[1], ids[3]]);
    }

    #[test]
    fn test_move_past_boundary_is_noop() {
        let conn = memory_conn();
        let subject_id = subject(&conn);
        let a = insert_series(&conn, subject_id, "a").unwrap();
        move_series(&conn, subject_id, a, -1).unwrap();
        move_series(&conn, subject_id, a, 1).unwrap();
        let list = list_series(&conn, subject_id).unwrap();
        assert_eq!(list[0].id, a);
        assert_eq!(list[0].sort_order, 0);
    }
}
