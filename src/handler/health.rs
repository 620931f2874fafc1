use axum::{extract::State, response::IntoResponse, Json};
use redb::ReadableDatabase;
use serde_json::json;

use crate::database::AppState;
use crate::error::AppResult;

/// Liveness check; also proves a read transaction can be opened
pub async fn health(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    state.db.begin_read()?;
    Ok(Json(json!({ "status": "ok", "database": "ready" })))
}
