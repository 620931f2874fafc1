//! Data models for the travel booking backend
//!
//! Records are stored as JSON documents in redb and sent to the browser in
//! the same shape: camelCase fields with the identifier under `_id`.
//! `*View` types are the "populated" forms where a destination id has been
//! replaced by the full destination document.

use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};

fn default_travelers() -> u32 {
    1
}

fn default_status() -> String {
    "Confirmed".to_string()
}

fn default_available() -> bool {
    true
}

/// Reads an optional number sent either as JSON number or as a string
///
/// HTML form inputs hand their values over as strings (`"3"`). A blank
/// string counts as absent.
fn lenient_number<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString<T> {
        Number(T),
        String(String),
    }

    match Option::<NumberOrString<T>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::String(raw)) if raw.trim().is_empty() => Ok(None),
        Some(NumberOrString::String(raw)) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| de::Error::custom(format!("invalid number {raw:?}: {e}"))),
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// A registered user as stored in the database
///
/// `password` holds the bcrypt hash and never leaves the server;
/// responses use [`UserProfile`].
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
        }
    }
}

/// Request payload for `POST /signup`
///
/// Fields are optional at the type level so a missing field is reported as
/// 400 "All fields are required" rather than a deserialization failure.
#[derive(Deserialize, Debug, Default)]
pub struct SignupRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Request payload for `PUT /api/users/{id}`
#[derive(Deserialize, Debug, Default)]
pub struct ProfileUpdateRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

// ---------------------------------------------------------------------------
// Destinations
// ---------------------------------------------------------------------------

/// A bookable location
///
/// # Example
/// ```json
/// {
///   "_id": "6710a2f3c1d2e3f4a5b6c7d8",
///   "name": "Goa",
///   "type": "beach",
///   "rating": 4.6,
///   "reviews": 120,
///   "description": "Sun and sand",
///   "imageUrl": "goa.jpg"
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Destination {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,

    /// Category tag such as "beach" or "hill-station"
    #[serde(rename = "type", default)]
    pub kind: String,

    /// 0 to 5
    #[serde(default)]
    pub rating: f64,

    #[serde(default)]
    pub reviews: u32,

    #[serde(default)]
    pub description: String,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or updating a destination
///
/// Creation requires `name`, `type`, `description` and `imageUrl`;
/// updates apply only the fields that are present.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct DestinationPayload {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<u32>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// Query string for `GET /destinations?q=goa&type=beach`
///
/// `q` matches name, type or description case-insensitively; `type` must
/// match exactly, ignoring case, and `all` disables it.
#[derive(Deserialize, Debug, Default)]
pub struct DestinationQuery {
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

// ---------------------------------------------------------------------------
// Bookings
// ---------------------------------------------------------------------------

/// Vehicle rental attached to a booking
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssignedTravel {
    pub name: String,

    /// 0 when neither the client nor the catalog knows the vehicle
    #[serde(default)]
    pub seats: u32,
    pub cost_per_day: u64,

    /// Inclusive trip days multiplied by `cost_per_day`
    pub total_price: u64,
    pub booked_at: DateTime<Utc>,
}

/// A reservation as stored in the database
///
/// `destination` is the destination id. `status` is free text compared
/// case-insensitively; the server only ever writes it when a client sends it.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub destination: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default = "default_travelers")]
    pub travelers: u32,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_travel: Option<AssignedTravel>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A booking with its destination populated
///
/// `destination` is `null` when the referenced destination has been deleted.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub destination: Option<Destination>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub travelers: u32,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_travel: Option<AssignedTravel>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingView {
    pub fn populate(booking: Booking, destination: Option<Destination>) -> Self {
        Self {
            id: booking.id,
            user_id: booking.user_id,
            destination,
            start_date: booking.start_date,
            end_date: booking.end_date,
            travelers: booking.travelers,
            status: booking.status,
            assigned_travel: booking.assigned_travel,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

/// Request payload for `POST /api/bookings`
///
/// # Example
/// ```json
/// {
///   "userId": "6710a2f3c1d2e3f4a5b6c7d8",
///   "destination": "6710a2f3c1d2e3f4a5b6c7d9",
///   "startDate": "2026-12-01",
///   "endDate": "2026-12-05",
///   "travelers": 2
/// }
/// ```
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub user_id: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub travelers: Option<u32>,
}

/// Request payload for `PUT /api/bookings/{id}`
///
/// Without `assignedTravel` both dates must be present. With it, the dates
/// may be omitted and the stored ones are kept.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookingRequest {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub travelers: Option<u32>,
    pub status: Option<String>,
    pub assigned_travel: Option<TravelAssignment>,
}

/// Vehicle chosen by the client; the price is computed server-side.
///
/// `name` and `costPerDay` are required by the handler. A missing `seats`
/// is taken from the travel catalog entry of the same name.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TravelAssignment {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub seats: Option<u32>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub cost_per_day: Option<u64>,
    pub booked_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub destination_id: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteView {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub destination_id: String,
    pub destination: Option<Destination>,
    pub created_at: DateTime<Utc>,
}

impl FavoriteView {
    pub fn populate(favorite: Favorite, destination: Option<Destination>) -> Self {
        Self {
            id: favorite.id,
            user_id: favorite.user_id,
            destination_id: favorite.destination_id,
            destination,
            created_at: favorite.created_at,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRequest {
    pub user_id: Option<String>,
    pub destination_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Activity log
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Booking,
    Favorite,
    Travel,
}

/// One entry of the append-only audit trail
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ActivityView {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub content: String,
    pub destination: Option<Destination>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRequest {
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub content: String,
    pub destination_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Content: images and pages
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub url: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
pub struct ImageRequest {
    pub title: Option<String>,
    pub url: String,
    pub category: String,
}

/// Query string for `GET /images?category=beach`
#[derive(Deserialize, Debug, Default)]
pub struct ImageQuery {
    pub category: Option<String>,
}

/// Static page addressed by its slug
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    #[serde(rename = "_id")]
    pub id: String,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
pub struct PageRequest {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
}

// ---------------------------------------------------------------------------
// Travel vehicles
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Travel {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub seats: u32,
    pub cost_per_day: u64,
    pub image_url: String,
    #[serde(default = "default_available")]
    pub available: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TravelRequest {
    pub name: String,
    pub seats: u32,
    pub cost_per_day: u64,
    pub image_url: String,
    pub available: Option<bool>,
}

/// Parses a client-supplied date
///
/// Accepts RFC 3339 (`2026-12-01T10:00:00Z`), a naive timestamp taken as UTC
/// (`2026-12-01T10:00:00`), or a plain date at UTC midnight (`2026-12-01`).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
