//! Command handlers, one module per top-level concern.

pub mod backup;
pub mod cal;
pub mod config;
pub mod db;
pub mod init;
pub mod library;
pub mod log;
pub mod lookup;
pub mod study;
pub mod transfer;

use crate::config::Config;
use crate::core::tracker::Tracker;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::date::Clock;

/// Open the database and load the tracker state.
pub(crate) fn open_tracker(cfg: &Config) -> AppResult<(DbPool, Tracker)> {
    let pool = DbPool::new(&cfg.database)?;
    let tracker = Tracker::load(&pool.storage(), Clock::now())?;
    Ok((pool, tracker))
}

/// Write back the keys touched by a command and record it in the internal log.
pub(crate) fn commit(
    pool: &DbPool,
    tracker: &mut Tracker,
    operation: &str,
    target: &str,
    message: &str,
) -> AppResult<()> {
    let written = tracker.save(&pool.storage())?;
    if !written.is_empty() {
        audit(&pool.conn, operation, target, message);
    }
    Ok(())
}
