use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use chrono::Utc;

use crate::database::AppState;
use crate::error::AppResult;
use crate::handler::{bookings::load_user_bookings, favorites::load_user_favorites};
use crate::insights::compute;
use crate::model::Destination;

/// Dashboard insights for a user, computed at request time
pub async fn get_insights(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let bookings = load_user_bookings(&state.db, &user_id)?;
    let favorites: Vec<Destination> = load_user_favorites(&state.db, &user_id)?
        .into_iter()
        .filter_map(|favorite| favorite.destination)
        .collect();

    Ok(Json(compute(&bookings, &favorites, Utc::now())))
}
