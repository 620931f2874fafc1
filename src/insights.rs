//! Travel insights derived from a user's bookings and favorites
//!
//! Everything here is a pure function of the fetched records and `now`;
//! nothing is persisted. A booking is *upcoming* when it is confirmed and has
//! not started, and *completed* when its status says so or its end date has
//! passed. Both are derived on every call because the server never moves a
//! booking's stored status.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{BookingView, Destination};

/// Summary returned by `GET /api/insights/{user_id}`
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TravelInsights {
    pub upcoming_count: usize,
    pub completed_count: usize,
    pub favorite_count: usize,
    pub total_travelers: u64,
    pub next_trip: Option<BookingView>,
    pub top_favorite_type: Option<String>,
    pub average_rating: f64,
    pub upcoming_trips: Vec<BookingView>,
}

fn status_is(booking: &BookingView, status: &str) -> bool {
    booking.status.trim().eq_ignore_ascii_case(status)
}

pub fn is_upcoming(booking: &BookingView, now: DateTime<Utc>) -> bool {
    status_is(booking, "confirmed") && booking.start_date > now
}

pub fn is_completed(booking: &BookingView, now: DateTime<Utc>) -> bool {
    status_is(booking, "completed") || booking.end_date < now
}

/// Upcoming bookings sorted by start date, soonest first
pub fn upcoming_trips(bookings: &[BookingView], now: DateTime<Utc>) -> Vec<BookingView> {
    let mut trips: Vec<BookingView> = bookings
        .iter()
        .filter(|b| is_upcoming(b, now))
        .cloned()
        .collect();
    trips.sort_by_key(|b| b.start_date);
    trips
}

pub fn completed_trips(bookings: &[BookingView], now: DateTime<Utc>) -> Vec<&BookingView> {
    bookings.iter().filter(|b| is_completed(b, now)).collect()
}

/// Sum of travelers, a zero count is taken as one traveler
pub fn total_travelers(bookings: &[BookingView]) -> u64 {
    bookings.iter().map(|b| u64::from(b.travelers.max(1))).sum()
}

/// Most frequent destination type among favorites
///
/// Untyped destinations are skipped. On a tie the type encountered first wins.
pub fn top_favorite_type(favorites: &[Destination]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();

    for kind in favorites.iter().map(|d| d.kind.as_str()).filter(|k| !k.is_empty()) {
        let count = counts.entry(kind).or_insert(0);
        if *count == 0 {
            order.push(kind);
        }
        *count += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for kind in order {
        let count = counts[kind];
        if best.map_or(true, |(_, top)| count > top) {
            best = Some((kind, count));
        }
    }
    best.map(|(kind, _)| kind.to_string())
}

/// Mean destination rating over completed trips, to one decimal place
///
/// Trips whose destination is gone or unrated do not count. Returns 0 when
/// no completed trip has a rating.
pub fn average_completed_rating(bookings: &[BookingView], now: DateTime<Utc>) -> f64 {
    let ratings: Vec<f64> = completed_trips(bookings, now)
        .into_iter()
        .filter_map(|b| b.destination.as_ref())
        .map(|d| d.rating)
        .filter(|rating| *rating > 0.0)
        .collect();

    if ratings.is_empty() {
        return 0.0;
    }
    let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
    (mean * 10.0).round() / 10.0
}

pub fn compute(
    bookings: &[BookingView],
    favorites: &[Destination],
    now: DateTime<Utc>,
) -> TravelInsights {
    let upcoming = upcoming_trips(bookings, now);

    TravelInsights {
        upcoming_count: upcoming.len(),
        completed_count: completed_trips(bookings, now).len(),
        favorite_count: favorites.len(),
        total_travelers: total_travelers(bookings),
        next_trip: upcoming.first().cloned(),
        top_favorite_type: top_favorite_type(favorites),
        average_rating: average_completed_rating(bookings, now),
        upcoming_trips: upcoming,
    }
}

/// Number of calendar days a trip spans, counting both ends
///
/// An end before the start yields 0.
pub fn trip_days(start: DateTime<Utc>, end: DateTime<Utc>) -> u64 {
    let days = (end.date_naive() - start.date_naive()).num_days() + 1;
    u64::try_from(days).unwrap_or(0)
}

/// Rental price of a vehicle for the whole trip
pub fn travel_price(start: DateTime<Utc>, end: DateTime<Utc>, cost_per_day: u64) -> u64 {
    trip_days(start, end).saturating_mul(cost_per_day)
}

/// A trip has ended once its end date is before today (UTC)
pub fn has_ended(end: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    end.date_naive() < now.date_naive()
}
