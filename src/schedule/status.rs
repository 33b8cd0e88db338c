//! Due-status derivation
//!
//! A problem's status is purely a function of its attempt history and is
//! recomputed on every read; nothing is stored. The cost is linear in
//! attempt count per problem, which is fine at notebook scale.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::config::UPCOMING_HORIZON_DAYS;
use crate::domain::{Attempt, AttemptResult};

/// Review interval policy: a poor result comes back in a week, a fair
/// one in two, a good one needs no further review. Fixed table, not
/// user-configurable.
pub fn review_interval_days(result: AttemptResult) -> i64 {
    match result {
        AttemptResult::Poor => 7,
        AttemptResult::Fair => 14,
        AttemptResult::Good => 0,
    }
}

/// Derived status of one problem.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStatus {
    /// Highest attempt ordinal so far (0 when unseen)
    pub last_no: u32,
    pub last_date: Option<NaiveDate>,
    /// Next review date; None when no review is needed
    pub next_due: Option<NaiveDate>,
    /// Hidden from the due/upcoming views (unseen or mastered)
    pub excluded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DueState {
    Unseen,
    Mastered,
    Overdue,
    Upcoming,
    Scheduled,
}

impl DueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unseen => "unseen",
            Self::Mastered => "mastered",
            Self::Overdue => "overdue",
            Self::Upcoming => "upcoming",
            Self::Scheduled => "scheduled",
        }
    }
}

/// Derive the status from a problem's attempts (any order accepted).
///
/// The governing attempt is the one with the highest attempt_no; ties on
/// attempt_no can only reach us through an imported snapshot from a
/// store that missed the unique index, and resolve to the
/// most-recently-written row (greatest id).
pub fn compute_status(attempts: &[Attempt]) -> ProblemStatus {
    let Some(last) = attempts.iter().max_by_key(|a| (a.attempt_no, a.id)) else {
        return ProblemStatus {
            last_no: 0,
            last_date: None,
            next_due: None,
            excluded: true,
        };
    };

    let interval = review_interval_days(last.result);
    if interval == 0 {
        return ProblemStatus {
            last_no: last.attempt_no,
            last_date: Some(last.done_date),
            next_due: None,
            excluded: true,
        };
    }

    ProblemStatus {
        last_no: last.attempt_no,
        last_date: Some(last.done_date),
        // Plain calendar arithmetic; dates carry no timezone
        next_due: Some(last.done_date + Duration::days(interval)),
        excluded: false,
    }
}

impl ProblemStatus {
    /// Classify against a reference date, with the default 7-day horizon
    /// for `Upcoming`.
    pub fn state(&self, today: NaiveDate) -> DueState {
        self.state_with_horizon(today, UPCOMING_HORIZON_DAYS)
    }

    pub fn state_with_horizon(&self, today: NaiveDate, horizon_days: i64) -> DueState {
        match self.next_due {
            None if self.last_no == 0 => DueState::Unseen,
            None => DueState::Mastered,
            Some(due) if due <= today => DueState::Overdue,
            Some(due) if due <= today + Duration::days(horizon_days) => DueState::Upcoming,
            Some(_) => DueState::Scheduled,
        }
    }

    /// Whole days past due; 0 unless overdue.
    pub fn overdue_days(&self, today: NaiveDate) -> i64 {
        match self.next_due {
            Some(due) => (today - due).num_days().max(0),
            None => 0,
        }
    }
}
