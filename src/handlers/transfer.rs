//! Snapshot export/import endpoints.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::db::{self, DbPool, Snapshot, StoreError};

/// GET /api/snapshot
pub async fn export(State(pool): State<DbPool>) -> Result<impl IntoResponse, StoreError> {
    let conn = db::try_lock(&pool)?;
    Ok(Json(db::export_snapshot(&conn)?))
}

/// POST /api/snapshot
///
/// Atomic overwrite of the whole store with the posted snapshot.
pub async fn import(
    State(pool): State<DbPool>,
    Json(snapshot): Json<Snapshot>,
) -> Result<impl IntoResponse, StoreError> {
    let conn = db::try_lock(&pool)?;
    db::import_snapshot(&conn, &snapshot)?;
    tracing::info!(
        subjects = snapshot.subjects.len(),
        attempts = snapshot.attempts.len(),
        "snapshot imported"
    );
    Ok(StatusCode::NO_CONTENT)
}
