//! Admin console data: full lists and booking removal

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::info;

use crate::database::{load_all, AppState, TABLE_DESTINATIONS, TABLE_USERS};
use crate::error::{AppError, AppResult};
use crate::handler::bookings::{load_all_bookings, remove_booking};
use crate::model::{Destination, User, UserProfile};

/// Every registered user, without password hashes
pub async fn list_users(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let users: Vec<User> = load_all(&state.db, TABLE_USERS)?;
    let profiles: Vec<UserProfile> = users.iter().map(UserProfile::from).collect();
    Ok(Json(profiles))
}

pub async fn list_bookings(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(load_all_bookings(&state.db)?))
}

pub async fn delete_booking(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let booking = remove_booking(&state.db, &id)?
        .ok_or_else(|| AppError::not_found("Booking not found"))?;

    info!(booking_id = %booking.id, "booking deleted by admin");

    Ok(Json(json!({
        "message": "Booking deleted successfully",
        "deleted_id": booking.id,
    })))
}

pub async fn list_destinations(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let destinations: Vec<Destination> = load_all(&state.db, TABLE_DESTINATIONS)?;
    Ok(Json(destinations))
}
