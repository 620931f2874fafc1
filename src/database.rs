//! Database initialization and table definitions
//!
//! Every collection is a redb table mapping a string key to a JSON document.
//! Secondary index tables provide uniqueness checks (usernames, emails,
//! favorite pairs) and per-user range scans (bookings, favorites, activities).

use std::fmt::Write as _;
use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Config;
use crate::error::AppResult;
use crate::model::{Destination, Travel};

/// Users by id
pub const TABLE_USERS: TableDefinition<&str, &str> = TableDefinition::new("users_v1");

/// Username -> user id, enforces unique usernames
pub const TABLE_USERNAMES: TableDefinition<&str, &str> = TableDefinition::new("usernames_v1");

/// Lowercased email -> user id, enforces unique emails
pub const TABLE_EMAILS: TableDefinition<&str, &str> = TableDefinition::new("emails_v1");

pub const TABLE_DESTINATIONS: TableDefinition<&str, &str> =
    TableDefinition::new("destinations_v1");

/// Bookings by id
pub const TABLE_BOOKINGS: TableDefinition<&str, &str> = TableDefinition::new("bookings_v1");

/// Index of bookings per user
///
/// Key: `(user_id, booking_id)`
/// Value: booking id
pub const TABLE_USER_BOOKINGS: TableDefinition<(&str, &str), &str> =
    TableDefinition::new("user_bookings_v2");

pub const TABLE_FAVORITES: TableDefinition<&str, &str> = TableDefinition::new("favorites_v1");

/// One entry per (user, destination) pair
///
/// Key: `(user_id, destination_id)`
/// Value: favorite id
pub const TABLE_FAVORITE_PAIRS: TableDefinition<(&str, &str), &str> =
    TableDefinition::new("favorite_pairs_v2");

/// Append-only activity log
///
/// Key: `(user_id, sequence)`
/// Value: JSON-serialized Activity
///
/// `sequence` is the creation time in microseconds, bumped past the user's
/// last entry when needed, so it is strictly increasing per user and a
/// reversed range scan yields the newest first.
pub const TABLE_ACTIVITIES: TableDefinition<(&str, u64), &str> =
    TableDefinition::new("activities_v2");

pub const TABLE_IMAGES: TableDefinition<&str, &str> = TableDefinition::new("images_v1");

/// Pages by slug
pub const TABLE_PAGES: TableDefinition<&str, &str> = TableDefinition::new("pages_v1");

pub const TABLE_TRAVELS: TableDefinition<&str, &str> = TableDefinition::new("travels_v1");

const DOCUMENT_TABLES: [TableDefinition<&str, &str>; 9] = [
    TABLE_USERS,
    TABLE_USERNAMES,
    TABLE_EMAILS,
    TABLE_DESTINATIONS,
    TABLE_BOOKINGS,
    TABLE_FAVORITES,
    TABLE_IMAGES,
    TABLE_PAGES,
    TABLE_TRAVELS,
];

/// Vehicles offered for travel assignment on a fresh database
const DEFAULT_TRAVELS: [(&str, u32, u64, &str); 3] = [
    ("Tempo Traveller", 17, 600, "tempo.jpg"),
    ("Thar", 6, 450, "thar.jpg"),
    ("Travels", 60, 1000, "travels.jpg"),
];

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db: Arc::new(db),
            config: Arc::new(config),
        }
    }
}

/// Initializes the embedded database and creates required tables
///
/// Creates or opens the file at `db_path`, opens every table so later read
/// transactions never see a missing table, and seeds the travel-vehicle
/// catalog when it is empty.
///
/// ```no_run
/// # use travelaura::database::init_db;
/// let db = init_db("travelaura.db").expect("Failed to initialize database");
/// ```
pub fn init_db(db_path: &str) -> AppResult<Database> {
    let db = Database::create(db_path)?;

    let write_txn = db.begin_write()?;
    {
        for table in DOCUMENT_TABLES {
            write_txn.open_table(table)?;
        }
        write_txn.open_table(TABLE_USER_BOOKINGS)?;
        write_txn.open_table(TABLE_FAVORITE_PAIRS)?;
        write_txn.open_table(TABLE_ACTIVITIES)?;

        let mut travels = write_txn.open_table(TABLE_TRAVELS)?;
        if travels.is_empty()? {
            for (name, seats, cost_per_day, image_url) in DEFAULT_TRAVELS {
                let travel = Travel {
                    id: new_id(),
                    name: name.to_string(),
                    seats,
                    cost_per_day,
                    image_url: image_url.to_string(),
                    available: true,
                    created_at: Utc::now(),
                };
                let json = to_json(&travel)?;
                travels.insert(travel.id.as_str(), json.as_str())?;
            }
        }
    }
    write_txn.commit()?;

    Ok(db)
}

/// Generates a 24-character hex document id
///
/// The first 4 bytes are the creation time in seconds, the remaining 8 are
/// random, so ids sort roughly by creation time.
pub fn new_id() -> String {
    let secs = Utc::now().timestamp() as u32;
    let tail: [u8; 8] = rand::rng().random();

    let mut id = format!("{secs:08x}");
    for byte in tail {
        let _ = write!(id, "{byte:02x}");
    }
    id
}

pub fn to_json<T: Serialize>(value: &T) -> AppResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Reads and deserializes one document from an open table
pub fn read_json<T, R>(table: &R, key: &str) -> AppResult<Option<T>>
where
    T: DeserializeOwned,
    R: ReadableTable<&'static str, &'static str>,
{
    match table.get(key)? {
        Some(guard) => Ok(Some(serde_json::from_str(guard.value())?)),
        None => Ok(None),
    }
}

/// Reads the string stored under `key` (used for index tables)
pub fn read_str<R>(table: &R, key: &str) -> AppResult<Option<String>>
where
    R: ReadableTable<&'static str, &'static str>,
{
    Ok(table.get(key)?.map(|guard| guard.value().to_string()))
}

/// Fetches a single document in its own read transaction
pub fn get_record<T: DeserializeOwned>(
    db: &Database,
    table: TableDefinition<&str, &str>,
    key: &str,
) -> AppResult<Option<T>> {
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(table)?;
    read_json(&table, key)
}

/// Loads every document of a table in key order
pub fn load_all<T: DeserializeOwned>(
    db: &Database,
    table: TableDefinition<&str, &str>,
) -> AppResult<Vec<T>> {
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(table)?;

    let mut records = Vec::new();
    for entry in table.iter()? {
        let (_, value) = entry?;
        records.push(serde_json::from_str(value.value())?);
    }
    Ok(records)
}

/// Values of every `(owner, _)` index entry in key order
pub fn index_values<R>(table: &R, owner: &str) -> AppResult<Vec<String>>
where
    R: ReadableTable<(&'static str, &'static str), &'static str>,
{
    let mut values = Vec::new();
    for entry in table.range((owner, "")..)? {
        let (key, value) = entry?;
        if key.value().0 != owner {
            break;
        }
        values.push(value.value().to_string());
    }
    Ok(values)
}

/// Looks up a destination for populating a booking, favorite or activity
pub fn find_destination<R>(table: &R, id: &str) -> AppResult<Option<Destination>>
where
    R: ReadableTable<&'static str, &'static str>,
{
    read_json(table, id)
}
