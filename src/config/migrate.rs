//! Config file upgrades: detect fields added in newer releases and write
//! them back with their default values.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use serde_yaml::Value;
use std::fs;
use std::path::Path;

/// Names of the fields a complete config file carries.
fn expected_fields() -> AppResult<Vec<String>> {
    let value = serde_yaml::to_value(Config::default()).map_err(|e| AppError::Config(e.to_string()))?;
    Ok(value
        .as_mapping()
        .map(|m| {
            m.keys()
                .filter_map(|k| k.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default())
}

/// Return the fields missing from the YAML file at `path`.
/// A missing file is reported as missing every field.
pub fn missing_fields(path: &Path) -> AppResult<Vec<String>> {
    let expected = expected_fields()?;
    if !path.exists() {
        return Ok(expected);
    }

    let content = fs::read_to_string(path)?;
    let yaml: Value =
        serde_yaml::from_str(&content).map_err(|e| AppError::Config(e.to_string()))?;
    let Some(map) = yaml.as_mapping() else {
        return Ok(expected);
    };

    Ok(expected
        .into_iter()
        .filter(|field| !map.contains_key(field.as_str()))
        .collect())
}

/// Rewrite the config file with defaults for every missing field.
///   Ok(true)  → config updated
///   Ok(false) → no change needed
pub fn migrate_config(path: &Path) -> AppResult<bool> {
    if !path.exists() {
        info(format!("No configuration file at {}", path.display()));
        return Ok(false);
    }

    let missing = missing_fields(path)?;
    if missing.is_empty() {
        return Ok(false);
    }

    let cfg = Config::load_from(path)?;
    fs::write(path, cfg.to_yaml()?)?;
    success(format!(
        "Configuration updated, added: {}",
        missing.join(", ")
    ));
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn reports_and_fills_missing_fields() {
        let path = env::temp_dir().join("calstudy_migrate_test.conf");
        fs::write(&path, "database: /tmp/calstudy.sqlite\nhttp_timeout_secs: 5\n").unwrap();

        let missing = missing_fields(&path).unwrap();
        assert!(missing.contains(&"usda_base_url".to_string()));
        assert!(!missing.contains(&"database".to_string()));

        assert!(migrate_config(&path).unwrap());
        assert!(missing_fields(&path).unwrap().is_empty());

        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.http_timeout_secs, 5);
        fs::remove_file(&path).ok();
    }
}
