use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::audit;
use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    {
        // opening the pool already applies pending migrations,
        // so --migrate opens the file raw and migrates explicitly
        if *migrate {
            let raw = DbPool::open_raw(&cfg.database)?;
            println!("{}▶ Running migrations…{}", CYAN, RESET);
            let applied = run_pending_migrations(&raw.conn)?;
            if applied.is_empty() {
                println!("{}✔ Schema already up to date.{}\n", GREEN, RESET);
            } else {
                for id in &applied {
                    println!("  • {id}");
                }
                println!("{}✔ Migration completed.{}\n", GREEN, RESET);
            }
        }

        if !(*info || *check || *vacuum) {
            return Ok(());
        }
        let pool = DbPool::new(&cfg.database)?;

        if *info {
            stats::print_db_info(&pool, &cfg.database)?;
        }

        if *check {
            println!("{}▶ Running integrity check…{}", CYAN, RESET);
            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;
            if integrity == "ok" {
                println!("{}✔ Integrity check passed.{}\n", GREEN, RESET);
            } else {
                println!("{}✘ Integrity check failed:{} {}\n", RED, RESET, integrity);
            }
        }

        if *vacuum {
            println!("{}▶ Running VACUUM…{}", CYAN, RESET);
            pool.conn.execute_batch("VACUUM;")?;
            audit(&pool.conn, "vacuum", "", "Database optimized");
            println!("{}✔ Vacuum completed.{}\n", GREEN, RESET);
        }
    }

    Ok(())
}
