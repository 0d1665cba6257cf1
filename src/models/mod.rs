//! Plain records persisted as JSON blobs in the key-value storage.
//! Field names follow the camelCase layout of exported files so that
//! older exports load unchanged.

pub mod day;
pub mod deck;
pub mod favorite;
pub mod food;
pub mod goals;
pub mod measurement;
pub mod numbers;
pub mod plan;
pub mod prefs;
pub mod recipe;
pub mod workout;

/// Fresh random identifier for a stored record.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
