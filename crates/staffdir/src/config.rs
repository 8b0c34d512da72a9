//! Configuration management for staffdir.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::employee::DEFAULT_SEED_COUNT;
use crate::error::{Error, Result};
use crate::format::COUNTRY_CODE;
use crate::router::BasePath;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "staffdir";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "directory.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `STAFFDIR_`)
/// 2. TOML config file at `~/.config/staffdir/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// List and notification behaviour.
    pub ui: UiConfig,
    /// Form validation rules.
    pub form: FormConfig,
    /// Routing configuration.
    pub router: RouterConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/staffdir/directory.db`
    pub database_path: Option<PathBuf>,
    /// Number of records written when the store holds no collection.
    pub seed_count: usize,
}

/// List view and notification configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Rows per page in the table view.
    pub list_page_size: usize,
    /// Cards per page in the card view.
    pub cards_page_size: usize,
    /// Simulated load delay before the list reads the store, in milliseconds.
    pub load_delay_ms: u64,
    /// How long list notifications stay visible, in milliseconds.
    pub list_toast_ms: u64,
    /// How long form notifications stay visible, in milliseconds.
    pub form_toast_ms: u64,
}

/// Form validation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Minimum number of phone digits, country code included.
    pub min_phone_digits: usize,
}

/// Routing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Deployment base path every browser-facing path lives under.
    pub base_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            seed_count: DEFAULT_SEED_COUNT,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            list_page_size: 8,
            cards_page_size: 4,
            load_delay_ms: 200,
            list_toast_ms: 1200,
            form_toast_ms: 3000,
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            min_phone_digits: 12,
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            base_path: "/".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("STAFFDIR_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.ui.list_page_size == 0 || self.ui.cards_page_size == 0 {
            return Err(Error::ConfigValidation {
                message: "page sizes must be greater than 0".to_string(),
            });
        }

        if self.form.min_phone_digits <= COUNTRY_CODE.len() {
            return Err(Error::ConfigValidation {
                message: format!(
                    "min_phone_digits ({}) must exceed the country code length ({})",
                    self.form.min_phone_digits,
                    COUNTRY_CODE.len()
                ),
            });
        }

        if BasePath::parse(&self.router.base_path).is_none() {
            return Err(Error::ConfigValidation {
                message: format!("invalid base_path: {}", self.router.base_path),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the parsed base path, falling back to the root.
    #[must_use]
    pub fn base_path(&self) -> BasePath {
        BasePath::parse(&self.router.base_path).unwrap_or_default()
    }

    /// Get the simulated list load delay as a Duration.
    #[must_use]
    pub fn load_delay(&self) -> Duration {
        Duration::from_millis(self.ui.load_delay_ms)
    }

    /// Get the list notification lifetime as a Duration.
    #[must_use]
    pub fn list_toast_duration(&self) -> Duration {
        Duration::from_millis(self.ui.list_toast_ms)
    }

    /// Get the form notification lifetime as a Duration.
    #[must_use]
    pub fn form_toast_duration(&self) -> Duration {
        Duration::from_millis(self.ui.form_toast_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.storage.seed_count, DEFAULT_SEED_COUNT);
        assert_eq!(config.ui.list_page_size, 8);
        assert_eq!(config.ui.cards_page_size, 4);
        assert_eq!(config.form.min_phone_digits, 12);
        assert_eq!(config.router.base_path, "/");
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_page_size() {
        let mut config = Config::default();
        config.ui.cards_page_size = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("page sizes"));
    }

    #[test]
    fn test_validate_short_phone_minimum() {
        let mut config = Config::default();
        config.form.min_phone_digits = 2;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("min_phone_digits"));
    }

    #[test]
    fn test_validate_bad_base_path() {
        let mut config = Config::default();
        config.router.base_path = "https://example.com/app".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("base_path"));
    }

    #[test]
    fn test_database_path_default() {
        let path = Config::default().database_path();
        assert!(path.to_string_lossy().contains("directory.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/db.sqlite"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/db.sqlite")
        );
    }

    #[test]
    fn test_base_path_parsed() {
        let mut config = Config::default();
        config.router.base_path = "repo".to_string();
        assert_eq!(config.base_path().as_str(), "/repo/");
    }

    #[test]
    fn test_durations() {
        let config = Config::default();
        assert_eq!(config.load_delay(), Duration::from_millis(200));
        assert_eq!(config.list_toast_duration(), Duration::from_millis(1200));
        assert_eq!(config.form_toast_duration(), Duration::from_secs(3));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("staffdir"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_ui_config_deserialize() {
        let json = r#"{"list_page_size": 10, "load_delay_ms": 0}"#;
        let ui: UiConfig = serde_json::from_str(json).unwrap();
        assert_eq!(ui.list_page_size, 10);
        assert_eq!(ui.load_delay_ms, 0);
        assert_eq!(ui.cards_page_size, 4);
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("min_phone_digits"));
        assert!(json.contains("base_path"));
    }
}
