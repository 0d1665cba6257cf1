use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use crate::ui::prompt::confirm;
use std::fs;
use std::path::{Path, PathBuf};
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the database to `dest_file`, optionally zipped.
    /// Returns the written path, or `None` when the user declined to overwrite.
    pub fn backup(
        pool: &DbPool,
        db_path: &str,
        dest_file: &str,
        compress: bool,
        assume_yes: bool,
    ) -> AppResult<Option<PathBuf>> {
        let src = Path::new(db_path);
        let dest = Path::new(dest_file);

        if !src.exists() {
            return Err(AppError::NotFound(format!("database {}", src.display())));
        }

        if let Some(parent) = dest.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let target = if compress {
            dest.with_extension("zip")
        } else {
            dest.to_path_buf()
        };
        if target.exists()
            && !confirm(
                &format!("The file '{}' already exists. Overwrite it?", target.display()),
                assume_yes,
            )
        {
            info("Backup cancelled.");
            return Ok(None);
        }

        let final_path = if compress {
            compress_into(src, &target)?
        } else {
            fs::copy(src, &target)?;
            target
        };
        success(format!("Backup created: {}", final_path.display()));

        audit(
            &pool.conn,
            "backup",
            &final_path.to_string_lossy(),
            if compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        );

        Ok(Some(final_path))
    }
}

/// Write `src` as the single entry of a zip archive at `zip_path`.
fn compress_into(src: &Path, zip_path: &Path) -> AppResult<PathBuf> {
    let file = fs::File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    let entry = src
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "calstudy.sqlite".to_string());
    zip.start_file(entry, options)
        .map_err(|e| AppError::Export(format!("zip: {e}")))?;

    let mut f = fs::File::open(src)?;
    std::io::copy(&mut f, &mut zip)?;
    zip.finish()
        .map_err(|e| AppError::Export(format!("zip: {e}")))?;
    Ok(zip_path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn backup_copies_and_zips() {
        let dir = env::temp_dir().join(format!("calstudy_backup_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let db = dir.join("src.sqlite");
        let db_path = db.to_string_lossy().to_string();
        let pool = DbPool::new(&db_path).unwrap();
        pool.storage().save("calorieGoals", &serde_json::json!({"calories": 1800})).unwrap();

        let plain = dir.join("copy.sqlite");
        let out = BackupLogic::backup(&pool, &db_path, &plain.to_string_lossy(), false, true)
            .unwrap()
            .unwrap();
        assert!(out.exists());

        let zipped = BackupLogic::backup(&pool, &db_path, &plain.to_string_lossy(), true, true)
            .unwrap()
            .unwrap();
        assert_eq!(zipped.extension().unwrap(), "zip");
        assert!(fs::metadata(&zipped).unwrap().len() > 0);

        let _ = fs::remove_dir_all(&dir);
    }
}
