//! Unified application error type.
//! All modules (db, core, api, cli, utils) return AppError to keep the error
//! handling consistent: every failure ends up as one line on stderr.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Storage-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Network
    // ---------------------------
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Unknown unit: {0}")]
    InvalidUnit(String),

    #[error("Invalid barcode: {0}")]
    InvalidBarcode(String),

    // ---------------------------
    // Logic errors
    // ---------------------------
    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unable to calculate: {0}")]
    Calculation(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // ---------------------------
    // Import / export errors
    // ---------------------------
    #[error("Import failed: {0}")]
    Import(String),

    #[error("Export error: {0}")]
    Export(String),
}

impl AppError {
    /// Shorthand used by form-style validation in the tracker and decks.
    pub fn invalid(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;
