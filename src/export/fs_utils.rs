// src/export/fs_utils.rs

use crate::errors::{AppError, AppResult};
use crate::ui::messages::info;
use crate::ui::prompt::confirm;
use std::fs;
use std::path::Path;

/// Check that a file can be created or overwritten.
///
/// - missing file: ok (parent directories are created)
/// - existing file and `force`: ok
/// - existing file otherwise: ask the user
pub fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    if !path.exists() || force {
        return Ok(());
    }

    if confirm(
        &format!("The file '{}' already exists. Overwrite?", path.display()),
        false,
    ) {
        info("Existing file will be overwritten.");
        Ok(())
    } else {
        Err(AppError::Export(
            "existing file not overwritten".to_string(),
        ))
    }
}
