//! Key-value storage of JSON blobs.
//!
//! Every piece of state lives under one fixed key. Reads never fail on bad
//! content: a missing key or malformed JSON yields the caller's fallback.

use crate::errors::AppResult;
use chrono::Local;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Fixed storage keys.
pub mod keys {
    pub const DAYS: &str = "calorieDays";
    pub const CURRENT_DAY: &str = "currentDayIndex";
    pub const TDEE: &str = "globalTDEE";
    pub const GOALS: &str = "calorieGoals";
    pub const PREFS: &str = "caloriePrefs";
    pub const FAVORITES: &str = "calorieFavorites";
    pub const SEARCH_HISTORY: &str = "calorieSearchHistory";
    pub const RECIPES: &str = "calorieRecipes";
    pub const PLANS: &str = "caloriePlans";
    pub const MEASUREMENTS: &str = "calorieMeasurements";
    pub const WORKOUTS: &str = "calorieWorkouts";
    pub const LAST_REMOVAL: &str = "calorieLastRemoval";
    pub const DECKS: &str = "flashcardDecks";
    pub const CURRENT_DECK: &str = "flashcardCurrentDeck";

    pub const ALL: [&str; 14] = [
        DAYS,
        CURRENT_DAY,
        TDEE,
        GOALS,
        PREFS,
        FAVORITES,
        SEARCH_HISTORY,
        RECIPES,
        PLANS,
        MEASUREMENTS,
        WORKOUTS,
        LAST_REMOVAL,
        DECKS,
        CURRENT_DECK,
    ];
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorageEntry {
    pub key: String,
    pub bytes: usize,
    pub updated_at: String,
}

pub struct Storage<'a> {
    conn: &'a Connection,
}

impl<'a> Storage<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Group several writes; dropping the transaction without `commit`
    /// rolls all of them back.
    pub fn transaction(&self) -> AppResult<Transaction<'a>> {
        Ok(self.conn.unchecked_transaction()?)
    }

    pub fn get_raw(&self, key: &str) -> AppResult<Option<String>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT value FROM storage WHERE key = ?1")?;
        Ok(stmt.query_row([key], |row| row.get(0)).optional()?)
    }

    pub fn set_raw(&self, key: &str, value: &str) -> AppResult<()> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO storage (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )?;
        stmt.execute(params![key, value, Local::now().to_rfc3339()])?;
        Ok(())
    }

    /// Returns true when a row was deleted.
    pub fn remove(&self, key: &str) -> AppResult<bool> {
        let n = self.conn.execute("DELETE FROM storage WHERE key = ?1", [key])?;
        Ok(n > 0)
    }

    /// Decode the blob under `key`; missing, `null` or malformed content
    /// yields `fallback()`.
    pub fn load<T, F>(&self, key: &str, fallback: F) -> AppResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let Some(raw) = self.get_raw(key)? else {
            return Ok(fallback());
        };
        match serde_json::from_str::<Option<T>>(&raw) {
            Ok(Some(v)) => Ok(v),
            _ => Ok(fallback()),
        }
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> AppResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set_raw(key, &raw)
    }

    pub fn entries(&self) -> AppResult<Vec<StorageEntry>> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT key, LENGTH(value), updated_at FROM storage ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok(StorageEntry {
                key: row.get(0)?,
                bytes: row.get::<_, i64>(1)?.max(0) as usize,
                updated_at: row.get(2)?,
            })
        })?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;

    #[test]
    fn malformed_blobs_load_as_fallback() {
        let pool = DbPool::in_memory().unwrap();
        let store = pool.storage();

        assert_eq!(store.load(keys::FAVORITES, Vec::<String>::new).unwrap(), Vec::<String>::new());

        store.set_raw(keys::SEARCH_HISTORY, "{not json").unwrap();
        let v: Vec<String> = store.load(keys::SEARCH_HISTORY, || vec!["x".into()]).unwrap();
        assert_eq!(v, vec!["x"]);

        store.set_raw(keys::SEARCH_HISTORY, "null").unwrap();
        let v: Vec<String> = store.load(keys::SEARCH_HISTORY, Vec::new).unwrap();
        assert!(v.is_empty());
    }

    #[test]
    fn save_overwrites_and_remove_deletes() {
        let pool = DbPool::in_memory().unwrap();
        let store = pool.storage();
        store.save(keys::CURRENT_DAY, &1).unwrap();
        store.save(keys::CURRENT_DAY, &3).unwrap();
        assert_eq!(store.load(keys::CURRENT_DAY, || 0usize).unwrap(), 3);
        assert_eq!(store.entries().unwrap().len(), 1);
        assert!(store.remove(keys::CURRENT_DAY).unwrap());
        assert!(!store.remove(keys::CURRENT_DAY).unwrap());
    }
}
