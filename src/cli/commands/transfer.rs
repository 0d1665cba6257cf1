use crate::cli::commands::commit;
use crate::core::tracker::Tracker;
use crate::core::transfer::{apply_import, default_file_name, export_json, food_rows, parse_import};
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::{ExportFormat, ensure_writable, notify_export_success, write_food_csv, write_json};
use crate::ui::messages::{info, success};
use crate::ui::prompt::confirm;
use crate::utils::path::expand_tilde;
use std::fs;
use std::path::PathBuf;

pub fn export(
    pool: &DbPool,
    t: &Tracker,
    format: ExportFormat,
    file: Option<&str>,
    force: bool,
) -> AppResult<()> {
    let path: PathBuf = match file {
        Some(f) => expand_tilde(f),
        None => PathBuf::from(format.file_name(&default_file_name(t.clock.today))),
    };
    ensure_writable(&path, force)?;

    match format {
        ExportFormat::Json => {
            write_json(&path, &export_json(t)?)?;
            notify_export_success("JSON", &path);
        }
        ExportFormat::Csv => {
            let rows = food_rows(&t.days);
            write_food_csv(&path, &rows)?;
            notify_export_success("CSV", &path);
            info(format!("{} food row(s) written.", rows.len()));
        }
    }
    audit(&pool.conn, "export", format.as_str(), &path.display().to_string());
    Ok(())
}

pub fn import(pool: &DbPool, t: &mut Tracker, file: &str, assume_yes: bool) -> AppResult<()> {
    let path = expand_tilde(file);
    let bytes = fs::read(&path)?;
    let raw = String::from_utf8(bytes).map_err(|_| AppError::Import("invalid JSON file".into()))?;
    let parsed = parse_import(&raw)?;

    if !confirm(
        "Importing replaces your current tracker data. Continue?",
        assume_yes,
    ) {
        info("Import cancelled.");
        return Ok(());
    }

    let summary = apply_import(t, &parsed);
    commit(
        pool,
        t,
        "import",
        &path.display().to_string(),
        &format!("{} day(s), {}", summary.days, summary.replaced.join(", ")),
    )?;
    success(format!(
        "Imported {} day(s). Replaced: {}.",
        summary.days,
        summary.replaced.join(", ")
    ));
    Ok(())
}
