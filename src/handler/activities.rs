//! Activity log: append and read back a user's recent actions

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use redb::{ReadableDatabase, ReadableTable, WriteTransaction};
use serde_json::json;

use crate::database::{
    find_destination, new_id, to_json, AppState, TABLE_ACTIVITIES, TABLE_DESTINATIONS,
};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::model::{Activity, ActivityKind, ActivityRequest, ActivityView};

/// Number of entries returned by the activity feed
pub const ACTIVITY_FEED_LIMIT: usize = 20;

pub(crate) fn new_activity(
    user_id: &str,
    kind: ActivityKind,
    content: String,
    destination_id: Option<String>,
) -> Activity {
    Activity {
        id: new_id(),
        user_id: user_id.to_string(),
        kind,
        content,
        destination_id,
        created_at: Utc::now(),
    }
}

/// Writes an activity inside the caller's transaction
///
/// Used by the booking and favorite handlers so the mutation and its audit
/// entry commit together. The sequence is the creation time in microseconds,
/// moved past the user's latest entry so two writes in the same microsecond
/// keep their commit order.
pub(crate) fn append_activity(write_txn: &WriteTransaction, activity: &Activity) -> AppResult<()> {
    let mut table = write_txn.open_table(TABLE_ACTIVITIES)?;
    let user_id = activity.user_id.as_str();

    let last = match table.range((user_id, 0u64)..=(user_id, u64::MAX))?.next_back() {
        Some(entry) => Some(entry?.0.value().1),
        None => None,
    };
    let micros = u64::try_from(activity.created_at.timestamp_micros()).unwrap_or(0);
    let sequence = match last {
        Some(last) => micros.max(last.saturating_add(1)),
        None => micros,
    };

    table.insert((user_id, sequence), to_json(activity)?.as_str())?;
    Ok(())
}

/// Logs a client-reported activity
///
/// # Request Body
///
/// ```json
/// { "userId": "...", "type": "travel", "content": "Assigned Thar", "destinationId": "..." }
/// ```
pub async fn log_activity(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ActivityRequest>,
) -> AppResult<impl IntoResponse> {
    if payload.user_id.trim().is_empty() || payload.content.trim().is_empty() {
        return Err(AppError::bad_request("userId and content are required"));
    }

    let activity = new_activity(
        payload.user_id.trim(),
        payload.kind,
        payload.content,
        payload.destination_id.filter(|id| !id.is_empty()),
    );

    let write_txn = state.db.begin_write()?;
    append_activity(&write_txn, &activity)?;
    write_txn.commit()?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Activity logged!", "activity": activity })),
    ))
}

/// Returns a user's most recent activities, newest first
///
/// Capped at [`ACTIVITY_FEED_LIMIT`] entries, destinations populated.
pub async fn list_activities(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let read_txn = state.db.begin_read()?;
    let table = read_txn.open_table(TABLE_ACTIVITIES)?;
    let destinations = read_txn.open_table(TABLE_DESTINATIONS)?;

    let user = user_id.as_str();
    let mut feed = Vec::new();
    for entry in table
        .range((user, 0u64)..=(user, u64::MAX))?
        .rev()
        .take(ACTIVITY_FEED_LIMIT)
    {
        let (_, value) = entry?;
        let activity: Activity = serde_json::from_str(value.value())?;
        let destination = match &activity.destination_id {
            Some(id) => find_destination(&destinations, id)?,
            None => None,
        };
        feed.push(ActivityView {
            id: activity.id,
            user_id: activity.user_id,
            kind: activity.kind,
            content: activity.content,
            destination,
            created_at: activity.created_at,
        });
    }

    Ok(Json(feed))
}
