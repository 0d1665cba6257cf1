use crate::db::migrate::run_pending_migrations;
use crate::errors::AppResult;
use rusqlite::Connection;

/// Initialize the database.
/// Delegates all schema creation / upgrades to the migration engine.
/// Returns the ids of the migrations applied by this call.
pub fn init_db(conn: &Connection) -> AppResult<Vec<&'static str>> {
    // No direct CREATE TABLE here: the schema is owned by migrations.
    run_pending_migrations(conn)
}
