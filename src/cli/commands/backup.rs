use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config, assume_yes: bool) -> AppResult<()> {
    if let Commands::Backup { file, compress } = cmd {
        // opening the pool would create an empty database
        if !Path::new(&cfg.database).exists() {
            return Err(AppError::NotFound(format!("database {}", cfg.database)));
        }
        let pool = DbPool::new(&cfg.database)?;
        let dest = expand_tilde(file);
        BackupLogic::backup(
            &pool,
            &cfg.database,
            &dest.to_string_lossy(),
            *compress,
            assume_yes,
        )?;
    }

    Ok(())
}
