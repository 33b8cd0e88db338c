//! Canonical sort orders for the four entity lists.
//!
//! These comparators define both persistence iteration order and display
//! order; the db list functions apply them after fetching. Names compare
//! by Unicode code point (deterministic; sort_order ties only occur
//! transiently because reorders renormalize the whole sibling list).

use std::cmp::Ordering;

use crate::domain::{Attempt, Problem, Series, Subject};

/// Subjects: sort_order, then name, then id.
pub fn subject_order(a: &Subject, b: &Subject) -> Ordering {
    a.sort_order
        .cmp(&b.sort_order)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Series within a subject: sort_order, then name, then id.
pub fn series_order(a: &Series, b: &Series) -> Ordering {
    a.sort_order
        .cmp(&b.sort_order)
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Problems within a series: kind rank, then number (missing as 0), then id.
pub fn problem_order(a: &Problem, b: &Problem) -> Ordering {
    a.kind
        .rank()
        .cmp(&b.kind.rank())
        .then_with(|| a.number.unwrap_or(0).cmp(&b.number.unwrap_or(0)))
        .then_with(|| a.id.cmp(&b.id))
}

/// Attempts of a problem in canonical history order:
/// attempt_no, then done_date, then id.
pub fn attempt_order(a: &Attempt, b: &Attempt) -> Ordering {
    a.attempt_no
        .cmp(&b.attempt_no)
        .then_with(|| a.done_date.cmp(&b.done_date))
        .then_with(|| a.id.cmp(&b.id))
}

/// Date order used by renumbering: done_date, then id.
pub fn history_order(a: &Attempt, b: &Attempt) -> Ordering {
    a.done_date.cmp(&b.done_date).then_with(|| a.id.cmp(&b.id))
}
