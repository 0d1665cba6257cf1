use crate::db::kv::{Storage, keys};
use crate::db::migrate::schema_version;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use serde_json::Value;
use std::fs;

/// Number of elements in an array (or keys in an object) blob.
fn blob_len(store: &Storage<'_>, key: &str) -> AppResult<Option<usize>> {
    let v: Value = store.load(key, || Value::Null)?;
    Ok(match v {
        Value::Array(a) => Some(a.len()),
        Value::Object(o) => Some(o.len()),
        _ => None,
    })
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> AppResult<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_kb = (file_size as f64) / 1024.0;

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.1} KB", CYAN, RESET, file_kb);
    println!(
        "{}• Schema version:{} {}",
        CYAN,
        RESET,
        schema_version(&pool.conn)?
    );

    //
    // 2) STORAGE KEYS
    //
    let store = pool.storage();
    let entries = store.entries()?;
    println!(
        "{}• Storage keys:{} {}{}{}",
        CYAN,
        RESET,
        GREEN,
        entries.len(),
        RESET
    );
    for e in &entries {
        println!("    {:<22} {:>8} B  {}{}{}", e.key, e.bytes, GREY, e.updated_at, RESET);
    }

    //
    // 3) RECORD COUNTS
    //
    println!("{}• Records:{}", CYAN, RESET);
    for (label, key) in [
        ("days", keys::DAYS),
        ("favorites", keys::FAVORITES),
        ("recipes", keys::RECIPES),
        ("plans", keys::PLANS),
        ("measurements", keys::MEASUREMENTS),
        ("workouts", keys::WORKOUTS),
        ("decks", keys::DECKS),
    ] {
        let shown = match blob_len(&store, key)? {
            Some(n) => n.to_string(),
            None => format!("{GREY}--{RESET}"),
        };
        println!("    {:<13} {}", label, shown);
    }

    let log_rows: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM log", [], |row| row.get(0))?;
    println!("{}• Log rows:{} {}", CYAN, RESET, log_rows);

    println!();
    Ok(())
}
