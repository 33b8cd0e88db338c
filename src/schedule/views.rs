//! Due and upcoming view assembly
//!
//! Walks every problem (optionally scoped to one subject), derives its
//! status and keeps the overdue/upcoming ones, sorted for display.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;

use crate::db::{self, StoreResult};
use crate::domain::{Series, Subject};
use crate::schedule::status::{DueState, compute_status};

/// One line of the due table.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueRow {
    pub problem_id: i64,
    pub subject_id: i64,
    pub subject: String,
    pub series: String,
    pub label: String,
    pub last_no: u32,
    pub last_date: NaiveDate,
    pub next_due: NaiveDate,
    pub overdue_days: i64,
}

/// One line of the upcoming table; rows group by next_due in display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingRow {
    pub problem_id: i64,
    pub subject_id: i64,
    pub subject: String,
    pub series: String,
    pub label: String,
    pub last_no: u32,
    pub last_date: NaiveDate,
    pub next_due: NaiveDate,
}

struct ViewContext {
    subjects: HashMap<i64, (usize, Subject)>,
    series: HashMap<i64, (usize, Series)>,
}

impl ViewContext {
    fn load(conn: &Connection) -> StoreResult<Self> {
        let subjects = db::list_subjects(conn)?
            .into_iter()
            .enumerate()
            .map(|(rank, s)| (s.id, (rank, s)))
            .collect();

        // Series rank is its position within its own subject's list
        let mut series = HashMap::new();
        let mut all = db::list_all_series(conn)?;
        all.sort_by(crate::domain::ordering::series_order);
        let mut per_subject: HashMap<i64, usize> = HashMap::new();
        for s in all {
            let rank = per_subject.entry(s.subject_id).or_insert(0);
            series.insert(s.id, (*rank, s));
            *rank += 1;
        }

        Ok(Self { subjects, series })
    }
}

/// All overdue problems, most urgent first: subject order, series order,
/// days overdue descending, then due date and label.
pub fn list_due(
    conn: &Connection,
    subject_scope: Option<i64>,
    today: NaiveDate,
) -> StoreResult<Vec<DueRow>> {
    let ctx = ViewContext::load(conn)?;
    let mut rows: Vec<(usize, usize, DueRow)> = Vec::new();

    for problem in db::list_all_problems(conn)? {
        let Some((series_rank, series)) = ctx.series.get(&problem.series_id) else {
            continue;
        };
        let Some((subject_rank, subject)) = ctx.subjects.get(&series.subject_id) else {
            continue;
        };
        if subject_scope.is_some_and(|id| id != subject.id) {
            continue;
        }

        let attempts = db::list_attempts(conn, problem.id)?;
        let status = compute_status(&attempts);
        if status.state(today) != DueState::Overdue {
            continue;
        }
        let (Some(last_date), Some(next_due)) = (status.last_date, status.next_due) else {
            continue;
        };

        rows.push((
            *subject_rank,
            *series_rank,
            DueRow {
                problem_id: problem.id,
                subject_id: subject.id,
                subject: subject.name.clone(),
                series: series.name.clone(),
                label: problem.label(),
                last_no: status.last_no,
                last_date,
                next_due,
                overdue_days: status.overdue_days(today),
            },
        ));
    }

    rows.sort_by(|(sub_a, ser_a, a), (sub_b, ser_b, b)| {
        sub_a
            .cmp(sub_b)
            .then_with(|| ser_a.cmp(ser_b))
            .then_with(|| b.overdue_days.cmp(&a.overdue_days))
            .then_with(|| a.next_due.cmp(&b.next_due))
            .then_with(|| a.label.cmp(&b.label))
    });
    Ok(rows.into_iter().map(|(_, _, row)| row).collect())
}

/// Problems due within the horizon (exclusive of today's overdue ones),
/// soonest first: due date, subject order, series order, label.
pub fn list_upcoming(
    conn: &Connection,
    subject_scope: Option<i64>,
    today: NaiveDate,
    horizon_days: i64,
) -> StoreResult<Vec<UpcomingRow>> {
    let ctx = ViewContext::load(conn)?;
    let mut rows: Vec<(usize, usize, UpcomingRow)> = Vec::new();

    for problem in db::list_all_problems(conn)? {
        let Some((series_rank, series)) = ctx.series.get(&problem.series_id) else {
            continue;
        };
        let Some((subject_rank, subject)) = ctx.subjects.get(&series.subject_id) else {
            continue;
        };
        if subject_scope.is_some_and(|id| id != subject.id) {
            continue;
        }

        let attempts = db::list_attempts(conn, problem.id)?;
        let status = compute_status(&attempts);
        if status.state_with_horizon(today, horizon_days) != DueState::Upcoming {
            continue;
        }
        let (Some(last_date), Some(next_due)) = (status.last_date, status.next_due) else {
            continue;
        };

        rows.push((
            *subject_rank,
            *series_rank,
            UpcomingRow {
                problem_id: problem.id,
                subject_id: subject.id,
                subject: subject.name.clone(),
                series: series.name.clone(),
                label: problem.label(),
                last_no: status.last_no,
                last_date,
                next_due,
            },
        ));
    }

    rows.sort_by(|(sub_a, ser_a, a), (sub_b, ser_b, b)| {
        a.next_due
            .cmp(&b.next_due)
            .then_with(|| sub_a.cmp(sub_b))
            .then_with(|| ser_a.cmp(ser_b))
            .then_with(|| a.label.cmp(&b.label))
    });
    Ok(rows.into_iter().map(|(_, _, row)| row).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{
        AttemptInput, get_or_create_problem, get_or_create_series, insert_attempt, insert_subject,
        move_subject,
    };
    use crate::domain::{AttemptResult, ProblemKind};
    use crate::testing::memory_conn;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn record(
        conn: &Connection,
        series_id: i64,
        number: u32,
        done: &str,
        result: AttemptResult,
    ) -> i64 {
        let problem_id =
            get_or_create_problem(conn, series_id, ProblemKind::Problem, Some(number)).unwrap();
        let attempt_no = crate::db::next_attempt_no(conn, problem_id).unwrap();
        insert_attempt(
            conn,
            problem_id,
            &AttemptInput {
                attempt_no,
                done_date: date(done),
                minutes: None,
                score: None,
                result,
            },
        )
        .unwrap();
        problem_id
    }

    #[test]
    fn test_due_excludes_unseen_and_mastered() {
        let conn = memory_conn();
        let subject_id = insert_subject(&conn, "消費税法").unwrap();
        let series_id = get_or_create_series(&conn, subject_id, "1-1").unwrap();

        // Unseen problem
        get_or_create_problem(&conn, series_id, ProblemKind::Problem, Some(9)).unwrap();
        // Mastered problem
        record(&conn, series_id, 1, "2024-06-01", AttemptResult::Good);
        // Overdue problem
        let overdue = record(&conn, series_id, 2, "2024-06-01", AttemptResult::Poor);

        let rows = list_due(&conn, None, date("2024-06-10")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].problem_id, overdue);
        assert_eq!(rows[0].overdue_days, 2);
        assert_eq!(rows[0].next_due, date("2024-06-08"));
    }

    #[test]
    fn test_due_sorted_by_subject_then_urgency() {
        let conn = memory_conn();
        let a = insert_subject(&conn, "a").unwrap();
        let b = insert_subject(&conn, "b").unwrap();
        let series_a = get_or_create_series(&conn, a, "1-1").unwrap();
        let series_b = get_or_create_series(&conn, b, "1-1").unwrap();

        // Subject b holds the most overdue problem, but subject a sorts first
        record(&conn, series_b, 1, "2024-05-01", AttemptResult::Poor);
        record(&conn, series_a, 1, "2024-06-01", AttemptResult::Poor);
        let rows = list_due(&conn, None, date("2024-06-20")).unwrap();
        assert_eq!(rows[0].subject, "a");
        assert_eq!(rows[1].subject, "b");

        // Reordering subjects flips the view
        move_subject(&conn, b, -1).unwrap();
        let rows = list_due(&conn, None, date("2024-06-20")).unwrap();
        assert_eq!(rows[0].subject, "b");
    }

    #[test]
    fn test_due_within_subject_most_overdue_first() {
        let conn = memory_conn();
        let subject_id = insert_subject(&conn, "a").unwrap();
        let series_id = get_or_create_series(&conn, subject_id, "1-1").unwrap();
        let older = record(&conn, series_id, 1, "2024-05-20", AttemptResult::Poor);
        let newer = record(&conn, series_id, 2, "2024-06-01", AttemptResult::Poor);

        let rows = list_due(&conn, None, date("2024-06-10")).unwrap();
        assert_eq!(rows[0].problem_id, older);
        assert_eq!(rows[1].problem_id, newer);
    }

    #[test]
    fn test_due_subject_scope_filters() {
        let conn = memory_conn();
        let a = insert_subject(&conn, "a").unwrap();
        let b = insert_subject(&conn, "b").unwrap();
        let series_a = get_or_create_series(&conn, a, "1-1").unwrap();
        let series_b = get_or_create_series(&conn, b, "1-1").unwrap();
        record(&conn, series_a, 1, "2024-06-01", AttemptResult::Poor);
        record(&conn, series_b, 1, "2024-06-01", AttemptResult::Poor);

        let rows = list_due(&conn, Some(b), date("2024-06-10")).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].subject, "b");
    }

    #[test]
    fn test_upcoming_window_and_order() {
        let conn = memory_conn();
        let subject_id = insert_subject(&conn, "a").unwrap();
        let series_id = get_or_create_series(&conn, subject_id, "1-1").unwrap();

        // Due 2024-06-08 (poor) and 2024-06-15 (fair from 2024-06-01)
        record(&conn, series_id, 1, "2024-06-01", AttemptResult::Poor);
        record(&conn, series_id, 2, "2024-06-01", AttemptResult::Fair);
        // Already overdue; must not appear in upcoming
        record(&conn, series_id, 3, "2024-05-01", AttemptResult::Poor);

        let today = date("2024-06-05");
        let rows = list_upcoming(&conn, None, today, 7).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].next_due, date("2024-06-08"));
        assert_eq!(rows[0].label, "Problem 1");

        // Widening the horizon pulls in the fair one, sorted by due date
        let rows = list_upcoming(&conn, None, today, 14).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].next_due, date("2024-06-08"));
        assert_eq!(rows[1].next_due, date("2024-06-15"));
    }

    #[test]
    fn test_upcoming_groups_share_due_date_sorted_by_subject() {
        let conn = memory_conn();
        let a = insert_subject(&conn, "a").unwrap();
        let b = insert_subject(&conn, "b").unwrap();
        let series_a = get_or_create_series(&conn, a, "1-1").unwrap();
        let series_b = get_or_create_series(&conn, b, "1-1").unwrap();
        record(&conn, series_b, 1, "2024-06-01", AttemptResult::Poor);
        record(&conn, series_a, 1, "2024-06-01", AttemptResult::Poor);

        let rows = list_upcoming(&conn, None, date("2024-06-02"), 7).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].subject, "a");
        assert_eq!(rows[1].subject, "b");
    }
}
