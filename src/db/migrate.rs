//! Schema migrations.
//!
//! Each migration runs once; applied ids are recorded in the `log` table as
//! `migration_applied` rows and the count is mirrored in `PRAGMA user_version`.

use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use chrono::Local;
use rusqlite::{Connection, OptionalExtension};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::FileOptions;

struct Migration {
    id: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        id: "20260901_0001_create_storage",
        description: "Created storage table",
        sql: r#"
            CREATE TABLE IF NOT EXISTS storage (
                key         TEXT PRIMARY KEY,
                value       TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            );
        "#,
    },
    Migration {
        id: "20260915_0002_log_operation_index",
        description: "Indexed log by operation",
        sql: r#"
            CREATE INDEX IF NOT EXISTS idx_log_operation ON log(operation, target);
        "#,
    },
];

/// Ensure that the `log` table exists; it also records applied migrations.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, id: &str) -> AppResult<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([id], |_| Ok(())).optional()?.is_some())
}

fn storage_has_rows(conn: &Connection) -> AppResult<bool> {
    let exists: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type='table' AND name='storage'",
            [],
            |row| row.get(0),
        )
        .optional()?;
    if exists.is_none() {
        return Ok(false);
    }
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM storage", [], |row| row.get(0))?;
    Ok(count > 0)
}

/// Zip the database file next to itself before touching a populated schema.
fn backup_before_migration(db_path: &str) -> AppResult<()> {
    let path = Path::new(db_path);
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    let backup_path = parent.join(format!(
        "{}-backup_db_pre_migration.zip",
        Local::now().format("%Y%m%d_%H%M%S")
    ));

    let mut zip = ZipWriter::new(File::create(&backup_path)?);
    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);
    zip.start_file("database.sqlite", options)
        .map_err(|e| AppError::Migration(format!("backup failed: {e}")))?;
    zip.write_all(&fs::read(path)?)?;
    zip.finish()
        .map_err(|e| AppError::Migration(format!("backup failed: {e}")))?;

    success(format!("📦 Backup created: {}", backup_path.display()));
    Ok(())
}

/// Ids of migrations not yet applied to this database.
pub fn pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut pending = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.id)? {
            pending.push(m.id);
        }
    }
    Ok(pending)
}

pub fn schema_version(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

/// Public entry point: run all pending migrations.
/// Returns the ids that were applied.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<Vec<&'static str>> {
    let pending = pending_migrations(conn)?;
    if pending.is_empty() {
        return Ok(pending);
    }

    if storage_has_rows(conn)? {
        warning("Schema upgrade pending, creating safety backup first...");
        let db_path: String = conn
            .query_row("PRAGMA database_list;", [], |row| row.get(2))
            .unwrap_or_default();
        if db_path.is_empty() {
            warning("Could not determine DB path, backup skipped.");
        } else {
            backup_before_migration(&db_path)?;
        }
    }

    for m in MIGRATIONS.iter().filter(|m| pending.contains(&m.id)) {
        conn.execute_batch(m.sql)
            .map_err(|e| AppError::Migration(format!("{}: {e}", m.id)))?;
        conn.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (?1, 'migration_applied', ?2, ?3)",
            [Local::now().to_rfc3339().as_str(), m.id, m.description],
        )?;
    }

    let applied = MIGRATIONS.len() - pending_migrations(conn)?.len();
    conn.pragma_update(None, "user_version", applied as i64)?;

    Ok(pending)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_apply_once() {
        let conn = Connection::open_in_memory().unwrap();
        let first = run_pending_migrations(&conn).unwrap();
        assert_eq!(first.len(), MIGRATIONS.len());
        assert!(run_pending_migrations(&conn).unwrap().is_empty());
        assert_eq!(schema_version(&conn).unwrap(), MIGRATIONS.len() as i64);

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('storage','log')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 2);
    }
}
