//! Attempt recording and editing endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::db::{self, AttemptInput, DbPool, StoreError};
use crate::domain::{Attempt, AttemptResult, ProblemKind};

/// Quick-record request: names the slot, and the series and problem are
/// created on first use. The attempt ordinal is assigned server-side.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest {
    pub subject_id: i64,
    pub series: String,
    pub kind: ProblemKind,
    pub number: Option<u32>,
    /// Defaults to today
    pub done_date: Option<NaiveDate>,
    pub minutes: Option<u32>,
    pub score: Option<f64>,
    pub result: AttemptResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub series_id: i64,
    pub problem_id: i64,
    pub attempt: Attempt,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAttemptRequest {
    pub attempt_no: u32,
    pub done_date: NaiveDate,
    pub minutes: Option<u32>,
    pub score: Option<f64>,
    pub result: AttemptResult,
}

/// POST /api/record
pub async fn record(
    State(pool): State<DbPool>,
    Json(request): Json<RecordRequest>,
) -> Result<impl IntoResponse, StoreError> {
    let conn = db::try_lock(&pool)?;

    let series_id = db::get_or_create_series(&conn, request.subject_id, &request.series)?;
    let problem_id = db::get_or_create_problem(&conn, series_id, request.kind, request.number)?;

    let input = AttemptInput {
        attempt_no: db::next_attempt_no(&conn, problem_id)?,
        done_date: request
            .done_date
            .unwrap_or_else(|| Local::now().date_naive()),
        minutes: request.minutes,
        score: request.score,
        result: request.result,
    };
    let attempt_id = db::insert_attempt(&conn, problem_id, &input)?;
    let attempt = db::get_attempt(&conn, attempt_id)?.ok_or(StoreError::NotFound("attempt"))?;

    tracing::debug!(problem_id, attempt_no = attempt.attempt_no, "recorded attempt");
    Ok((
        StatusCode::CREATED,
        Json(RecordResponse {
            series_id,
            problem_id,
            attempt,
        }),
    ))
}

/// PUT /api/attempts/{id}
pub async fn update(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateAttemptRequest>,
) -> Result<impl IntoResponse, StoreError> {
    let conn = db::try_lock(&pool)?;
    let input = AttemptInput {
        attempt_no: request.attempt_no,
        done_date: request.done_date,
        minutes: request.minutes,
        score: request.score,
        result: request.result,
    };
    db::update_attempt(&conn, id, &input)?;
    let attempt = db::get_attempt(&conn, id)?.ok_or(StoreError::NotFound("attempt"))?;
    Ok(Json(attempt))
}

/// DELETE /api/attempts/{id}
pub async fn remove(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, StoreError> {
    let conn = db::try_lock(&pool)?;
    db::delete_attempt(&conn, id)?;
    Ok(StatusCode::NO_CONTENT)
}
