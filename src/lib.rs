//! TravelAura booking backend
//!
//! This module exposes internal components for the binary and the
//! integration tests.

pub mod config;
pub mod database;
pub mod error;
pub mod extract;
pub mod handler;
pub mod insights;
pub mod middleware;
pub mod model;
pub mod route;
