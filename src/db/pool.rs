//! SQLite connection wrapper (lightweight for CLI usage).

use crate::db::initialize::init_db;
use crate::db::kv::Storage;
use crate::errors::AppResult;
use rusqlite::Connection;
use std::fs;
use std::path::Path;

pub struct DbPool {
    pub conn: Connection,
}

impl DbPool {
    /// Open (or create) the database and bring its schema up to date.
    pub fn new(path: &str) -> AppResult<Self> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(Path::new(path))?;
        init_db(&conn)?;
        Ok(Self { conn })
    }

    /// Open the file as-is, without running migrations.
    pub fn open_raw(path: &str) -> AppResult<Self> {
        Ok(Self {
            conn: Connection::open(Path::new(path))?,
        })
    }

    pub fn in_memory() -> AppResult<Self> {
        let conn = Connection::open_in_memory()?;
        init_db(&conn)?;
        Ok(Self { conn })
    }

    /// Key-value view over the `storage` table.
    pub fn storage(&self) -> Storage<'_> {
        Storage::new(&self.conn)
    }
}
