// src/export/mod.rs

mod csv;
mod fs_utils;
mod json;

pub use self::csv::write_food_csv;
pub use fs_utils::ensure_writable;
pub use json::write_json;

use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

/// Shared completion message for every export.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    /// Swap the extension of a default file name to match the format.
    pub fn file_name(&self, json_name: &str) -> String {
        match self {
            ExportFormat::Json => json_name.to_string(),
            ExportFormat::Csv => Path::new(json_name)
                .with_extension("csv")
                .to_string_lossy()
                .into_owned(),
        }
    }
}
