//! Favorites: one bookmark per (user, destination) pair

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable};
use serde_json::json;
use tracing::info;

use crate::database::{
    find_destination, index_values, new_id, read_json, to_json, AppState,
    TABLE_DESTINATIONS, TABLE_FAVORITES, TABLE_FAVORITE_PAIRS,
};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::handler::activities::{append_activity, new_activity};
use crate::handler::present;
use crate::model::{ActivityKind, Favorite, FavoriteRequest, FavoriteView};

/// Loads a user's favorites with destinations populated
pub(crate) fn load_user_favorites(db: &Database, user_id: &str) -> AppResult<Vec<FavoriteView>> {
    let read_txn = db.begin_read()?;
    let pairs = read_txn.open_table(TABLE_FAVORITE_PAIRS)?;
    let favorites = read_txn.open_table(TABLE_FAVORITES)?;
    let destinations = read_txn.open_table(TABLE_DESTINATIONS)?;

    let mut views = Vec::new();
    for favorite_id in index_values(&pairs, user_id)? {
        if let Some(favorite) = read_json::<Favorite, _>(&favorites, &favorite_id)? {
            let destination = find_destination(&destinations, &favorite.destination_id)?;
            views.push(FavoriteView::populate(favorite, destination));
        }
    }
    Ok(views)
}

/// Bookmarks a destination for a user
///
/// # Response
///
/// - **201 Created** - `{ "message": "Favorite added!", "favorite": {...} }`
/// - **404 Not Found** - unknown destination
/// - **409 Conflict** - `{ "error": "Already favorited", "favorite": {...} }`
///   carrying the existing record
pub async fn add_favorite(
    State(state): State<AppState>,
    AppJson(payload): AppJson<FavoriteRequest>,
) -> AppResult<Response> {
    let (Some(user_id), Some(destination_id)) =
        (present(payload.user_id), present(payload.destination_id))
    else {
        return Err(AppError::bad_request("userId and destinationId are required"));
    };

    let write_txn = state.db.begin_write()?;
    let favorite = {
        let destination = {
            let destinations = write_txn.open_table(TABLE_DESTINATIONS)?;
            find_destination(&destinations, &destination_id)?
                .ok_or_else(|| AppError::not_found("Destination not found"))?
        };

        let mut pairs = write_txn.open_table(TABLE_FAVORITE_PAIRS)?;
        let mut favorites = write_txn.open_table(TABLE_FAVORITES)?;

        let existing_id = pairs
            .get((user_id.as_str(), destination_id.as_str()))?
            .map(|guard| guard.value().to_string());
        if let Some(existing_id) = existing_id {
            let existing: Option<Favorite> = read_json(&favorites, &existing_id)?;
            return Ok((
                StatusCode::CONFLICT,
                Json(json!({ "error": "Already favorited", "favorite": existing })),
            )
                .into_response());
        }

        let favorite = Favorite {
            id: new_id(),
            user_id,
            destination_id,
            created_at: Utc::now(),
        };
        favorites.insert(favorite.id.as_str(), to_json(&favorite)?.as_str())?;
        pairs.insert(
            (favorite.user_id.as_str(), favorite.destination_id.as_str()),
            favorite.id.as_str(),
        )?;

        let activity = new_activity(
            &favorite.user_id,
            ActivityKind::Favorite,
            format!("Added {} to favorites", destination.name),
            Some(destination.id),
        );
        append_activity(&write_txn, &activity)?;

        favorite
    };
    write_txn.commit()?;

    info!(user_id = %favorite.user_id, destination_id = %favorite.destination_id, "favorite added");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Favorite added!", "favorite": favorite })),
    )
        .into_response())
}

/// Lists a user's favorites
///
/// Mounted on `GET /favorites/{id}` where the path segment is the user id;
/// `DELETE` on the same path takes a favorite id.
pub async fn list_favorites(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(load_user_favorites(&state.db, &user_id)?))
}

/// Removes a favorite and frees its (user, destination) pair
pub async fn remove_favorite(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let write_txn = state.db.begin_write()?;
    {
        let mut favorites = write_txn.open_table(TABLE_FAVORITES)?;
        let raw = favorites
            .remove(id.as_str())?
            .map(|guard| guard.value().to_string())
            .ok_or_else(|| AppError::not_found("Favorite not found"))?;
        let favorite: Favorite = serde_json::from_str(&raw)?;

        let mut pairs = write_txn.open_table(TABLE_FAVORITE_PAIRS)?;
        pairs.remove((favorite.user_id.as_str(), favorite.destination_id.as_str()))?;
    }
    write_txn.commit()?;

    Ok(Json(json!({ "message": "Favorite removed", "deleted_id": id })))
}
