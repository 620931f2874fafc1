//! HTTP request handlers, one module per resource
//!
//! Handlers run redb transactions directly: multi-document writes (a booking
//! plus its index entry and activity record, a user plus its uniqueness
//! indexes) share one write transaction and commit together.

pub mod activities;
pub mod admin;
pub mod bookings;
pub mod content;
pub mod destinations;
pub mod favorites;
pub mod health;
pub mod insights;
pub mod travels;
pub mod users;

/// Trims a payload field and treats blank strings as missing
pub(crate) fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
