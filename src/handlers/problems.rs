//! Problem matrix endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Local;
use serde::Serialize;

use crate::db::{self, DbPool, StoreError};
use crate::domain::{Attempt, Problem};
use crate::schedule::{compute_status, ProblemStatus};

/// One problem of the matrix with its full attempt history and derived
/// status, the unit the series view renders.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemRow {
    #[serde(flatten)]
    pub problem: Problem,
    pub label: String,
    pub attempts: Vec<Attempt>,
    pub status: ProblemStatus,
    pub state: &'static str,
}

/// GET /api/series/{id}/problems
pub async fn matrix(
    State(pool): State<DbPool>,
    Path(series_id): Path<i64>,
) -> Result<impl IntoResponse, StoreError> {
    let conn = db::try_lock(&pool)?;
    if db::get_series(&conn, series_id)?.is_none() {
        return Err(StoreError::NotFound("series"));
    }

    let today = Local::now().date_naive();
    let mut rows = Vec::new();
    for problem in db::list_problems(&conn, series_id)? {
        let attempts = db::list_attempts(&conn, problem.id)?;
        let status = compute_status(&attempts);
        let state = status.state(today).as_str();
        rows.push(ProblemRow {
            label: problem.label(),
            problem,
            attempts,
            status,
            state,
        });
    }
    Ok(Json(rows))
}

/// DELETE /api/problems/{id}
pub async fn remove(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, StoreError> {
    let conn = db::try_lock(&pool)?;
    db::delete_problem(&conn, id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/problems/{id}/renumber
///
/// Compacts the attempt ordinals to 1..n by date and returns the
/// renumbered history.
pub async fn renumber(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, StoreError> {
    let conn = db::try_lock(&pool)?;
    if db::get_problem(&conn, id)?.is_none() {
        return Err(StoreError::NotFound("problem"));
    }
    db::renumber_attempts(&conn, id)?;
    Ok(Json(db::list_attempts(&conn, id)?))
}
