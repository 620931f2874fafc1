//! Destination catalog handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::database::{
    get_record, load_all, new_id, read_json, to_json, AppState, TABLE_DESTINATIONS,
};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::handler::present;
use crate::model::{Destination, DestinationPayload, DestinationQuery};

fn check_rating(rating: f64) -> AppResult<f64> {
    if (0.0..=5.0).contains(&rating) {
        Ok(rating)
    } else {
        Err(AppError::bad_request("Rating must be between 0 and 5"))
    }
}

/// Creates a destination
///
/// `name`, `type`, `description` and `imageUrl` are required; `rating`
/// defaults to 0.
pub async fn create_destination(
    State(state): State<AppState>,
    AppJson(payload): AppJson<DestinationPayload>,
) -> AppResult<impl IntoResponse> {
    let (Some(name), Some(kind), Some(description), Some(image_url)) = (
        present(payload.name),
        present(payload.kind),
        present(payload.description),
        present(payload.image_url),
    ) else {
        return Err(AppError::bad_request(
            "Name, type, description, and imageUrl are required",
        ));
    };

    let now = Utc::now();
    let destination = Destination {
        id: new_id(),
        name,
        kind,
        rating: check_rating(payload.rating.unwrap_or(0.0))?,
        reviews: payload.reviews.unwrap_or(0),
        description,
        image_url,
        created_at: now,
        updated_at: now,
    };

    let write_txn = state.db.begin_write()?;
    {
        let mut table = write_txn.open_table(TABLE_DESTINATIONS)?;
        table.insert(destination.id.as_str(), to_json(&destination)?.as_str())?;
    }
    write_txn.commit()?;

    info!(destination = %destination.name, "destination created");

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Destination created successfully!",
            "destination": destination,
        })),
    ))
}

/// Filters destinations by the query and ranks them by rating, best first
///
/// Equal ratings keep their stored order.
pub fn search_destinations(
    destinations: Vec<Destination>,
    query: &DestinationQuery,
) -> Vec<Destination> {
    let needle = query
        .q
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());
    let kind = query
        .kind
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty() && !k.eq_ignore_ascii_case("all"));

    let mut results: Vec<Destination> = destinations
        .into_iter()
        .filter(|d| kind.map_or(true, |kind| d.kind.eq_ignore_ascii_case(kind)))
        .filter(|d| {
            needle.as_deref().map_or(true, |needle| {
                d.name.to_lowercase().contains(needle)
                    || d.kind.to_lowercase().contains(needle)
                    || d.description.to_lowercase().contains(needle)
            })
        })
        .collect();
    results.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    results
}

/// Lists destinations, highest rated first
///
/// `GET /destinations?q=goa&type=beach`
pub async fn list_destinations(
    State(state): State<AppState>,
    Query(query): Query<DestinationQuery>,
) -> AppResult<impl IntoResponse> {
    let destinations: Vec<Destination> = load_all(&state.db, TABLE_DESTINATIONS)?;
    Ok(Json(search_destinations(destinations, &query)))
}

pub async fn get_destination(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let destination: Destination = get_record(&state.db, TABLE_DESTINATIONS, &id)?
        .ok_or_else(|| AppError::not_found("Destination not found"))?;
    Ok(Json(destination))
}

/// Applies the fields present in the payload to an existing destination
pub async fn update_destination(
    Path(id): Path<String>,
    State(state): State<AppState>,
    AppJson(payload): AppJson<DestinationPayload>,
) -> AppResult<impl IntoResponse> {
    let write_txn = state.db.begin_write()?;
    let destination = {
        let mut table = write_txn.open_table(TABLE_DESTINATIONS)?;
        let mut destination: Destination = read_json(&table, &id)?
            .ok_or_else(|| AppError::not_found("Destination not found"))?;

        if let Some(name) = present(payload.name) {
            destination.name = name;
        }
        if let Some(kind) = present(payload.kind) {
            destination.kind = kind;
        }
        if let Some(rating) = payload.rating {
            destination.rating = check_rating(rating)?;
        }
        if let Some(reviews) = payload.reviews {
            destination.reviews = reviews;
        }
        if let Some(description) = present(payload.description) {
            destination.description = description;
        }
        if let Some(image_url) = present(payload.image_url) {
            destination.image_url = image_url;
        }
        destination.updated_at = Utc::now();

        table.insert(id.as_str(), to_json(&destination)?.as_str())?;
        destination
    };
    write_txn.commit()?;

    info!(destination = %destination.name, "destination updated");

    Ok(Json(json!({
        "message": "Destination updated successfully",
        "destination": destination,
    })))
}

/// Deletes exactly one destination
///
/// Bookings and favorites that reference it stay in place and are populated
/// with `null` from then on.
pub async fn delete_destination(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let write_txn = state.db.begin_write()?;
    let removed: Destination = {
        let mut table = write_txn.open_table(TABLE_DESTINATIONS)?;
        let raw = table.remove(id.as_str())?.map(|guard| guard.value().to_string());
        match raw {
            Some(raw) => serde_json::from_str(&raw)?,
            None => return Err(AppError::not_found("Destination not found")),
        }
    };
    write_txn.commit()?;

    info!(destination = %removed.name, "destination deleted");

    Ok(Json(json!({
        "message": "Destination deleted successfully",
        "deleted_id": id,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn destination(name: &str, kind: &str, rating: f64) -> Destination {
        Destination {
            id: name.to_lowercase(),
            name: name.to_string(),
            kind: kind.to_string(),
            rating,
            reviews: 0,
            description: format!("Visit {name}"),
            image_url: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn catalog() -> Vec<Destination> {
        vec![
            destination("Goa", "beach", 4.2),
            destination("Manali", "hill-station", 4.8),
            destination("Gokarna", "Beach", 4.5),
        ]
    }

    fn names(results: &[Destination]) -> Vec<&str> {
        results.iter().map(|d| d.name.as_str()).collect()
    }

    #[test]
    fn unfiltered_list_is_ranked_by_rating() {
        let results = search_destinations(catalog(), &DestinationQuery::default());
        assert_eq!(names(&results), ["Manali", "Gokarna", "Goa"]);
    }

    #[test]
    fn type_filter_ignores_case_and_all() {
        let query = DestinationQuery {
            q: None,
            kind: Some("BEACH".to_string()),
        };
        assert_eq!(names(&search_destinations(catalog(), &query)), ["Gokarna", "Goa"]);

        let query = DestinationQuery {
            q: None,
            kind: Some("all".to_string()),
        };
        assert_eq!(search_destinations(catalog(), &query).len(), 3);
    }

    #[test]
    fn text_search_covers_name_type_and_description() {
        let by_name = DestinationQuery {
            q: Some("go".to_string()),
            kind: None,
        };
        assert_eq!(names(&search_destinations(catalog(), &by_name)), ["Gokarna", "Goa"]);

        let by_type = DestinationQuery {
            q: Some(" hill ".to_string()),
            kind: None,
        };
        assert_eq!(names(&search_destinations(catalog(), &by_type)), ["Manali"]);

        let by_description = DestinationQuery {
            q: Some("visit manali".to_string()),
            kind: None,
        };
        assert_eq!(names(&search_destinations(catalog(), &by_description)), ["Manali"]);
    }
}
