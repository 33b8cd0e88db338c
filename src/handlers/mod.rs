//! JSON API surface.
//!
//! Thin glue over `db` and `schedule`: every handler locks the shared
//! connection, calls into the store and maps the outcome to a status
//! code. No domain logic lives here.

pub mod attempts;
pub mod problems;
pub mod reviews;
pub mod series;
pub mod subjects;
pub mod transfer;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;

use crate::db::{DbPool, StoreError};

pub fn router(pool: DbPool) -> Router {
    Router::new()
        .route("/api/subjects", get(subjects::list).post(subjects::create))
        .route("/api/subjects/{id}/move", post(subjects::reorder))
        .route("/api/subjects/{id}/series", get(series::list_for_subject))
        .route("/api/series", post(series::create))
        .route("/api/series/{id}/move", post(series::reorder))
        .route("/api/series/{id}/problems", get(problems::matrix))
        .route("/api/problems/{id}", delete(problems::remove))
        .route("/api/problems/{id}/renumber", post(problems::renumber))
        .route("/api/record", post(attempts::record))
        .route(
            "/api/attempts/{id}",
            put(attempts::update).delete(attempts::remove),
        )
        .route("/api/review/due", get(reviews::due))
        .route("/api/review/upcoming", get(reviews::upcoming))
        .route("/api/snapshot", get(transfer::export).post(transfer::import))
        .with_state(pool)
}

/// Duplicate -> 409, Invalid -> 422, NotFound -> 404, the rest -> 500.
/// Server-side failures are logged here so handlers stay plain `?` chains.
impl IntoResponse for StoreError {
    fn into_response(self) -> Response {
        let status = match &self {
            StoreError::Duplicate(_) => StatusCode::CONFLICT,
            StoreError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Locked | StoreError::Sqlite(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("store operation failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
