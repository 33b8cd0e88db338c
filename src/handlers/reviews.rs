//! Due and upcoming review endpoints.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::Local;
use serde::Deserialize;

use crate::config::UPCOMING_HORIZON_DAYS;
use crate::db::{self, DbPool, StoreError};
use crate::schedule;

#[derive(Debug, Deserialize)]
pub struct ReviewQuery {
    /// Restrict to one subject id; absent means all subjects
    pub subject: Option<i64>,
    /// Horizon in days for the upcoming view
    pub days: Option<i64>,
}

/// GET /api/review/due?subject=
pub async fn due(
    State(pool): State<DbPool>,
    Query(query): Query<ReviewQuery>,
) -> Result<impl IntoResponse, StoreError> {
    let conn = db::try_lock(&pool)?;
    let today = Local::now().date_naive();
    Ok(Json(schedule::list_due(&conn, query.subject, today)?))
}

/// GET /api/review/upcoming?subject=&days=
pub async fn upcoming(
    State(pool): State<DbPool>,
    Query(query): Query<ReviewQuery>,
) -> Result<impl IntoResponse, StoreError> {
    let horizon = query.days.unwrap_or(UPCOMING_HORIZON_DAYS);
    if horizon < 1 {
        return Err(StoreError::Invalid("days must be at least 1".to_string()));
    }

    let conn = db::try_lock(&pool)?;
    let today = Local::now().date_naive();
    Ok(Json(schedule::list_upcoming(
        &conn,
        query.subject,
        today,
        horizon,
    )?))
}
