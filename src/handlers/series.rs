//! Series endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::db::{self, DbPool, StoreError};
use crate::handlers::subjects::MoveRequest;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSeriesRequest {
    pub subject_id: i64,
    pub name: String,
}

/// GET /api/subjects/{id}/series
pub async fn list_for_subject(
    State(pool): State<DbPool>,
    Path(subject_id): Path<i64>,
) -> Result<impl IntoResponse, StoreError> {
    let conn = db::try_lock(&pool)?;
    if db::get_subject(&conn, subject_id)?.is_none() {
        return Err(StoreError::NotFound("subject"));
    }
    Ok(Json(db::list_series(&conn, subject_id)?))
}

/// POST /api/series
///
/// Explicit creation; duplicates within the subject are a 409. Quick
/// recording goes through /api/record instead, which get-or-creates.
pub async fn create(
    State(pool): State<DbPool>,
    Json(request): Json<CreateSeriesRequest>,
) -> Result<impl IntoResponse, StoreError> {
    let conn = db::try_lock(&pool)?;
    let id = db::insert_series(&conn, request.subject_id, &request.name)?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// POST /api/series/{id}/move
pub async fn reorder(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
    Json(request): Json<MoveRequest>,
) -> Result<impl IntoResponse, StoreError> {
    let conn = db::try_lock(&pool)?;
    let Some(series) = db::get_series(&conn, id)? else {
        return Err(StoreError::NotFound("series"));
    };
    db::move_series(&conn, series.subject_id, id, request.direction)?;
    Ok(StatusCode::NO_CONTENT)
}
