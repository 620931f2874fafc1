//! Runtime configuration
//!
//! Values come from the process environment (optionally seeded from a `.env`
//! file by `dotenvy` in `main`). Every key has a default so the server starts
//! with no configuration at all.

use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

/// Static credentials accepted by `POST /admin/login`
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub id: String,
    pub username: String,
    pub password: String,
    pub email: String,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        Self {
            id: "static-admin-001".to_string(),
            username: "admin".to_string(),
            password: "admin123".to_string(),
            email: "admin@travelaura.com".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// TCP port the HTTP server binds to
    pub port: u16,

    /// Path of the redb database file
    pub database_url: String,

    pub admin: AdminCredentials,

    /// Shared secret for `/admin/*` data routes.
    /// `None` leaves those routes open.
    pub admin_key: Option<String>,

    /// bcrypt work factor used when hashing user passwords
    pub bcrypt_cost: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            database_url: "travelaura.db".to_string(),
            admin: AdminCredentials::default(),
            admin_key: None,
            bcrypt_cost: 10,
        }
    }
}

impl Config {
    /// Reads the configuration from environment variables
    ///
    /// # Environment Variables
    ///
    /// - `PORT` - Server port number (default: 5000)
    /// - `DATABASE_URL` - Path to database file (default: "travelaura.db")
    /// - `ADMIN_USERNAME` / `ADMIN_PASSWORD` / `ADMIN_EMAIL` - static admin login
    /// - `ADMIN_KEY` - required `Authorization` value for admin data routes
    /// - `BCRYPT_COST` - password hashing cost (default: 10)
    pub fn from_env() -> Self {
        let defaults = Config::default();

        let admin = AdminCredentials {
            username: env::var("ADMIN_USERNAME").unwrap_or(defaults.admin.username),
            password: env::var("ADMIN_PASSWORD").unwrap_or(defaults.admin.password),
            email: env::var("ADMIN_EMAIL").unwrap_or(defaults.admin.email),
            ..defaults.admin
        };

        Self {
            port: try_load("PORT", defaults.port),
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            admin,
            admin_key: env::var("ADMIN_KEY").ok().filter(|key| !key.is_empty()),
            bcrypt_cost: bcrypt_cost(
                try_load("BCRYPT_COST", defaults.bcrypt_cost),
                defaults.bcrypt_cost,
            ),
        }
    }
}

/// Work factors bcrypt accepts
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

fn bcrypt_cost(cost: u32, default: u32) -> u32 {
    if BCRYPT_COST_RANGE.contains(&cost) {
        cost
    } else {
        warn!("BCRYPT_COST {cost} outside {BCRYPT_COST_RANGE:?}, using default: {default}");
        default
    }
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default}");
            default
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bcrypt_cost_outside_range_falls_back() {
        assert_eq!(bcrypt_cost(12, 10), 12);
        assert_eq!(bcrypt_cost(4, 10), 4);
        assert_eq!(bcrypt_cost(31, 10), 31);
        assert_eq!(bcrypt_cost(3, 10), 10);
        assert_eq!(bcrypt_cost(99, 10), 10);
    }
}
