use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::AppResult;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database with every pending migration
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.as_deref(), cli.test)?;
    let db_path = db_path.to_string_lossy().to_string();

    println!("⚙️  Initializing calstudy…");
    println!("📄 Config file : {}", Config::config_file().display());
    println!("🗄️  Database   : {}", &db_path);

    let pool = DbPool::new(&db_path)?;
    println!("✅ Database initialized at {}", &db_path);

    audit(
        &pool.conn,
        "init",
        "",
        &format!("Database initialized at {}", &db_path),
    );

    println!("🎉 calstudy initialization completed!");
    Ok(())
}
