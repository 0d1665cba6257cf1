use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub mod migrate; // use submodule at src/config/migrate.rs

/// Environment variable that can carry the FoodData Central key.
pub const USDA_KEY_ENV: &str = "USDA_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default)]
    pub usda_api_key: String,
    #[serde(default = "default_usda_base_url")]
    pub usda_base_url: String,
    #[serde(default = "default_off_base_url")]
    pub openfoodfacts_base_url: String,
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
    #[serde(default = "default_deck")]
    pub default_deck: String,
}

fn default_usda_base_url() -> String {
    "https://api.nal.usda.gov".to_string()
}
fn default_off_base_url() -> String {
    "https://world.openfoodfacts.net".to_string()
}
fn default_http_timeout() -> u64 {
    15
}
fn default_deck() -> String {
    "Default".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            usda_api_key: String::new(),
            usda_base_url: default_usda_base_url(),
            openfoodfacts_base_url: default_off_base_url(),
            http_timeout_secs: default_http_timeout(),
            default_deck: default_deck(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("calstudy")
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".calstudy")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("calstudy.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("calstudy.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| AppError::Config(format!("cannot parse {}: {e}", path.display())))
    }

    /// FoodData Central key: config first, then environment, then the public demo key.
    pub fn usda_key(&self) -> String {
        if !self.usda_api_key.trim().is_empty() {
            return self.usda_api_key.trim().to_string();
        }
        env::var(USDA_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .unwrap_or_else(|| "DEMO_KEY".to_string())
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Initialize configuration and database files.
    /// Returns the database path that was configured.
    pub fn init_all(custom_db: Option<&str>, is_test: bool) -> AppResult<PathBuf> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = Path::new(name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    dir.join(p)
                }
            }
            None => dir.join("calstudy.sqlite"),
        };

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write config file
        if !is_test {
            fs::create_dir_all(&dir)?;
            let config = Self::with_database(db_path.clone());
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(config.to_yaml()?.as_bytes())?;
            println!("✅ Config file: {}", Self::config_file().display());
        }

        Ok(db_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_optional_fields_take_defaults() {
        let cfg: Config = serde_yaml::from_str("database: /tmp/x.sqlite\n").unwrap();
        assert_eq!(cfg.database, "/tmp/x.sqlite");
        assert_eq!(cfg.http_timeout_secs, 15);
        assert_eq!(cfg.default_deck, "Default");
        assert_eq!(cfg.usda_base_url, "https://api.nal.usda.gov");
    }

    #[test]
    fn configured_key_wins_over_environment() {
        let mut cfg = Config::default();
        cfg.usda_api_key = " abc ".into();
        assert_eq!(cfg.usda_key(), "abc");
    }
}
