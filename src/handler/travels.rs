//! Travel-vehicle catalog used for booking travel assignment

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::database::{load_all, new_id, to_json, AppState, TABLE_TRAVELS};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::model::{Travel, TravelRequest};

pub async fn list_travels(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let travels: Vec<Travel> = load_all(&state.db, TABLE_TRAVELS)?;
    Ok(Json(travels))
}

pub async fn create_travel(
    State(state): State<AppState>,
    AppJson(payload): AppJson<TravelRequest>,
) -> AppResult<impl IntoResponse> {
    if payload.name.trim().is_empty() || payload.image_url.trim().is_empty() {
        return Err(AppError::bad_request("name and imageUrl are required"));
    }
    if payload.seats == 0 {
        return Err(AppError::bad_request("seats must be at least 1"));
    }

    let travel = Travel {
        id: new_id(),
        name: payload.name.trim().to_string(),
        seats: payload.seats,
        cost_per_day: payload.cost_per_day,
        image_url: payload.image_url,
        available: payload.available.unwrap_or(true),
        created_at: Utc::now(),
    };

    let write_txn = state.db.begin_write()?;
    {
        let mut table = write_txn.open_table(TABLE_TRAVELS)?;
        table.insert(travel.id.as_str(), to_json(&travel)?.as_str())?;
    }
    write_txn.commit()?;

    info!(vehicle = %travel.name, "travel vehicle added");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Travel added!", "travel": travel })),
    ))
}
