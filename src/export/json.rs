use crate::errors::AppResult;
use std::fs;
use std::path::Path;

/// Write already-serialized JSON, newline terminated.
pub fn write_json(path: &Path, json: &str) -> AppResult<()> {
    let mut out = json.to_string();
    if !out.ends_with('\n') {
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(())
}
