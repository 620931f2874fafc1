//! Booking lifecycle: creation, lookup, modification, travel assignment
//! and cancellation
//!
//! Every mutation except cancellation records an activity in the same write
//! transaction as the booking itself.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable, WriteTransaction};
use serde_json::json;
use tracing::info;

use crate::database::{
    find_destination, index_values, load_all, new_id, read_json, to_json, AppState,
    TABLE_BOOKINGS, TABLE_DESTINATIONS, TABLE_TRAVELS, TABLE_USER_BOOKINGS,
};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::handler::activities::{append_activity, new_activity};
use crate::handler::present;
use crate::insights::{has_ended, travel_price};
use crate::model::{
    parse_date, ActivityKind, AssignedTravel, Booking, BookingView, CreateBookingRequest, Travel,
    TravelAssignment, UpdateBookingRequest,
};

fn parse_field(raw: &str, field: &str) -> AppResult<DateTime<Utc>> {
    parse_date(raw).ok_or_else(|| AppError::bad_request(format!("Invalid {field}: {raw}")))
}

fn check_date_order(start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<()> {
    if end <= start {
        return Err(AppError::bad_request("End date must be after start date"));
    }
    Ok(())
}

/// Seat count of the catalog vehicle with this name, 0 if it is not listed
fn catalog_seats(write_txn: &WriteTransaction, name: &str) -> AppResult<u32> {
    let travels = write_txn.open_table(TABLE_TRAVELS)?;
    for entry in travels.iter()? {
        let (_, value) = entry?;
        let travel: Travel = serde_json::from_str(value.value())?;
        if travel.name.eq_ignore_ascii_case(name) {
            return Ok(travel.seats);
        }
    }
    Ok(0)
}

fn check_travelers(travelers: u32) -> AppResult<u32> {
    if travelers == 0 {
        return Err(AppError::bad_request("At least one traveler is required"));
    }
    Ok(travelers)
}

/// Loads a user's bookings with destinations populated
pub(crate) fn load_user_bookings(db: &Database, user_id: &str) -> AppResult<Vec<BookingView>> {
    let read_txn = db.begin_read()?;
    let index = read_txn.open_table(TABLE_USER_BOOKINGS)?;
    let bookings = read_txn.open_table(TABLE_BOOKINGS)?;
    let destinations = read_txn.open_table(TABLE_DESTINATIONS)?;

    let mut views = Vec::new();
    for booking_id in index_values(&index, user_id)? {
        if let Some(booking) = read_json::<Booking, _>(&bookings, &booking_id)? {
            let destination = find_destination(&destinations, &booking.destination)?;
            views.push(BookingView::populate(booking, destination));
        }
    }
    Ok(views)
}

/// Loads every booking with destinations populated
pub(crate) fn load_all_bookings(db: &Database) -> AppResult<Vec<BookingView>> {
    let bookings: Vec<Booking> = load_all(db, TABLE_BOOKINGS)?;

    let read_txn = db.begin_read()?;
    let destinations = read_txn.open_table(TABLE_DESTINATIONS)?;
    bookings
        .into_iter()
        .map(|booking| {
            let destination = find_destination(&destinations, &booking.destination)?;
            Ok(BookingView::populate(booking, destination))
        })
        .collect()
}

/// Deletes a booking and its per-user index entry
///
/// Returns the removed booking, or `None` when the id is unknown.
pub(crate) fn remove_booking(db: &Database, id: &str) -> AppResult<Option<Booking>> {
    let write_txn = db.begin_write()?;
    let removed = {
        let mut bookings = write_txn.open_table(TABLE_BOOKINGS)?;
        let raw = bookings.remove(id)?.map(|guard| guard.value().to_string());
        match raw {
            Some(raw) => {
                let booking: Booking = serde_json::from_str(&raw)?;
                let mut index = write_txn.open_table(TABLE_USER_BOOKINGS)?;
                index.remove((booking.user_id.as_str(), booking.id.as_str()))?;
                Some(booking)
            }
            None => None,
        }
    };
    write_txn.commit()?;
    Ok(removed)
}

/// Creates a booking
///
/// # Request Body
///
/// ```json
/// {
///   "userId": "...",
///   "destination": "...",
///   "startDate": "2026-12-01",
///   "endDate": "2026-12-05",
///   "travelers": 2
/// }
/// ```
///
/// # Response
///
/// - **201 Created** - the booking with its destination populated
/// - **400 Bad Request** - missing ids or dates, unparsable dates, end not
///   after start, zero travelers
/// - **404 Not Found** - the destination does not exist
///
/// Writes the booking, the per-user index entry and a `booking` activity in
/// one transaction.
pub async fn create_booking(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateBookingRequest>,
) -> AppResult<impl IntoResponse> {
    let (Some(user_id), Some(destination_id)) =
        (present(payload.user_id), present(payload.destination))
    else {
        return Err(AppError::bad_request("userId and destination are required"));
    };
    let (Some(start_raw), Some(end_raw)) =
        (present(payload.start_date), present(payload.end_date))
    else {
        return Err(AppError::bad_request("Start and End dates are required"));
    };

    let start_date = parse_field(&start_raw, "startDate")?;
    let end_date = parse_field(&end_raw, "endDate")?;
    check_date_order(start_date, end_date)?;
    let travelers = check_travelers(payload.travelers.unwrap_or(1))?;

    let now = Utc::now();
    let booking = Booking {
        id: new_id(),
        user_id,
        destination: destination_id,
        start_date,
        end_date,
        travelers,
        status: "Confirmed".to_string(),
        assigned_travel: None,
        created_at: now,
        updated_at: now,
    };

    let write_txn = state.db.begin_write()?;
    let view = {
        let destination = {
            let destinations = write_txn.open_table(TABLE_DESTINATIONS)?;
            find_destination(&destinations, &booking.destination)?
                .ok_or_else(|| AppError::not_found("Destination not found"))?
        };

        let mut bookings = write_txn.open_table(TABLE_BOOKINGS)?;
        bookings.insert(booking.id.as_str(), to_json(&booking)?.as_str())?;

        let mut index = write_txn.open_table(TABLE_USER_BOOKINGS)?;
        index.insert(
            (booking.user_id.as_str(), booking.id.as_str()),
            booking.id.as_str(),
        )?;

        let activity = new_activity(
            &booking.user_id,
            ActivityKind::Booking,
            format!("Booked trip to {}", destination.name),
            Some(destination.id.clone()),
        );
        append_activity(&write_txn, &activity)?;

        BookingView::populate(booking, Some(destination))
    };
    write_txn.commit()?;

    info!(booking_id = %view.id, user_id = %view.user_id, "booking created");

    Ok((StatusCode::CREATED, Json(view)))
}

/// Lists every booking
pub async fn list_all_bookings(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok(Json(load_all_bookings(&state.db)?))
}

/// Lists a user's bookings
///
/// Mounted on `GET /api/bookings/{id}` where the path segment is the
/// user id; `PUT` and `DELETE` on the same path take a booking id.
pub async fn list_user_bookings(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(load_user_bookings(&state.db, &user_id)?))
}

/// Fetches a single booking by id
pub async fn get_booking(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let read_txn = state.db.begin_read()?;
    let bookings = read_txn.open_table(TABLE_BOOKINGS)?;
    let booking: Booking =
        read_json(&bookings, &id)?.ok_or_else(|| AppError::not_found("Booking not found"))?;

    let destinations = read_txn.open_table(TABLE_DESTINATIONS)?;
    let destination = find_destination(&destinations, &booking.destination)?;
    Ok(Json(BookingView::populate(booking, destination)))
}

/// Modifies a booking or assigns a travel vehicle to it
///
/// # Request Body
///
/// ```json
/// {
///   "startDate": "2026-12-01",
///   "endDate": "2026-12-05",
///   "travelers": 3,
///   "status": "Confirmed",
///   "assignedTravel": { "name": "Thar", "seats": 6, "costPerDay": 450 }
/// }
/// ```
///
/// Without `assignedTravel` both dates are required. Present fields are
/// merged into the stored booking and the merged dates must still be in
/// order. Numeric fields may be sent as strings. A travel assignment needs
/// `name` and `costPerDay`, is refused once the trip has ended, and takes
/// its seat count from the catalog when `seats` is omitted; its `totalPrice`
/// is the inclusive trip length times `costPerDay`.
///
/// Logs a `travel` activity for assignments and a `booking` activity
/// otherwise, in the same transaction as the update.
pub async fn update_booking(
    Path(id): Path<String>,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateBookingRequest>,
) -> AppResult<impl IntoResponse> {
    let start_date = present(payload.start_date)
        .map(|raw| parse_field(&raw, "startDate"))
        .transpose()?;
    let end_date = present(payload.end_date)
        .map(|raw| parse_field(&raw, "endDate"))
        .transpose()?;

    let assignment = match payload.assigned_travel {
        Some(TravelAssignment {
            name,
            seats,
            cost_per_day,
            booked_at,
        }) => match (present(name), cost_per_day) {
            (Some(name), Some(cost_per_day)) => Some((name, seats, cost_per_day, booked_at)),
            _ => {
                return Err(AppError::bad_request(
                    "assignedTravel requires name and costPerDay",
                ))
            }
        },
        None => None,
    };

    if assignment.is_none() && (start_date.is_none() || end_date.is_none()) {
        return Err(AppError::bad_request("Start and End dates are required"));
    }
    let travelers = payload.travelers.map(check_travelers).transpose()?;

    let now = Utc::now();
    let write_txn = state.db.begin_write()?;
    let view = {
        let mut bookings = write_txn.open_table(TABLE_BOOKINGS)?;
        let mut booking: Booking =
            read_json(&bookings, &id)?.ok_or_else(|| AppError::not_found("Booking not found"))?;

        if let Some(start_date) = start_date {
            booking.start_date = start_date;
        }
        if let Some(end_date) = end_date {
            booking.end_date = end_date;
        }
        check_date_order(booking.start_date, booking.end_date)?;

        if let Some(travelers) = travelers {
            booking.travelers = travelers;
        }
        if let Some(status) = present(payload.status) {
            booking.status = status;
        }

        let destination = {
            let destinations = write_txn.open_table(TABLE_DESTINATIONS)?;
            find_destination(&destinations, &booking.destination)?
        };
        // Deleted destinations are referred to by id in the activity text.
        let label = destination
            .as_ref()
            .map(|d| d.name.clone())
            .unwrap_or_else(|| format!("destination {}", booking.destination));

        let assigned = match assignment {
            Some((name, seats, cost_per_day, booked_at)) => {
                if has_ended(booking.end_date, now) {
                    return Err(AppError::bad_request(
                        "This trip has already ended. Cannot assign travel for completed trips.",
                    ));
                }
                let seats = match seats {
                    Some(seats) => seats,
                    None => catalog_seats(&write_txn, &name)?,
                };
                let travel = AssignedTravel {
                    total_price: travel_price(booking.start_date, booking.end_date, cost_per_day),
                    name,
                    seats,
                    cost_per_day,
                    booked_at: booked_at.unwrap_or(now),
                };
                let name = travel.name.clone();
                booking.assigned_travel = Some(travel);
                Some(name)
            }
            None => None,
        };

        booking.updated_at = now;
        bookings.insert(booking.id.as_str(), to_json(&booking)?.as_str())?;

        let (kind, content) = match assigned {
            Some(vehicle) => (
                ActivityKind::Travel,
                format!("Assigned {vehicle} for {label}"),
            ),
            None => (ActivityKind::Booking, format!("Modified booking for {label}")),
        };
        let activity = new_activity(
            &booking.user_id,
            kind,
            content,
            Some(booking.destination.clone()),
        );
        append_activity(&write_txn, &activity)?;

        BookingView::populate(booking, destination)
    };
    write_txn.commit()?;

    info!(booking_id = %view.id, "booking updated");

    Ok(Json(view))
}

/// Cancels a booking by deleting it
///
/// No activity is recorded for cancellations.
pub async fn delete_booking(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let booking = remove_booking(&state.db, &id)?
        .ok_or_else(|| AppError::not_found("Booking not found"))?;

    info!(booking_id = %booking.id, user_id = %booking.user_id, "booking cancelled");

    Ok(Json(json!({
        "message": "Booking deleted successfully",
        "deleted_id": booking.id,
    })))
}
