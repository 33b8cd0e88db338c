//! Subject endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::db::{self, DbPool, StoreError};

#[derive(Debug, Deserialize)]
pub struct CreateSubjectRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    /// -1 moves toward the front, +1 toward the back
    pub direction: i64,
}

/// GET /api/subjects
pub async fn list(State(pool): State<DbPool>) -> Result<impl IntoResponse, StoreError> {
    let conn = db::try_lock(&pool)?;
    Ok(Json(db::list_subjects(&conn)?))
}

/// POST /api/subjects
pub async fn create(
    State(pool): State<DbPool>,
    Json(request): Json<CreateSubjectRequest>,
) -> Result<impl IntoResponse, StoreError> {
    let conn = db::try_lock(&pool)?;
    let id = db::insert_subject(&conn, &request.name)?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// POST /api/subjects/{id}/move
pub async fn reorder(
    State(pool): State<DbPool>,
    Path(id): Path<i64>,
    Json(request): Json<MoveRequest>,
) -> Result<impl IntoResponse, StoreError> {
    let conn = db::try_lock(&pool)?;
    if db::get_subject(&conn, id)?.is_none() {
        return Err(StoreError::NotFound("subject"));
    }
    db::move_subject(&conn, id, request.direction)?;
    Ok(StatusCode::NO_CONTENT)
}
