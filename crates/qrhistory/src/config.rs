//! Configuration management for qrhistory.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::render::{RenderOptions, MAX_ENCODABLE_BYTES};
use crate::storage::{validate_key, Backend, DEFAULT_KEY};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "qrhistory";

/// Database file name used by the `SQLite` backend.
const DATABASE_FILE_NAME: &str = "history.db";

/// Prefix of configuration environment variables.
const ENV_PREFIX: &str = "QRHISTORY_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `QRHISTORY_`, sections separated
///    by `__`, e.g. `QRHISTORY_STORAGE__BACKEND=sqlite`)
/// 2. TOML config file at `~/.config/qrhistory/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// QR rendering configuration.
    pub render: RenderConfig,
    /// Input validation configuration.
    pub input: InputConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Which medium holds the history.
    pub backend: Backend,
    /// Directory for history files and the database.
    /// Defaults to `~/.local/share/qrhistory`
    pub data_dir: Option<PathBuf>,
    /// Key the history is stored under.
    pub key: String,
}

/// Rendering-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Pixel size of the latest QR code when exported as SVG.
    pub latest_size: u32,
    /// Pixel size of history thumbnails when exported as SVG.
    pub thumbnail_size: u32,
    /// Surround the code with the standard four-module quiet zone.
    pub quiet_zone: bool,
    /// Swap dark and light modules in terminal output, for light-on-dark
    /// terminals whose scanners expect dark-on-light.
    pub invert: bool,
}

/// Input-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Longest accepted text in bytes.
    pub max_text_length: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: Backend::File,
            data_dir: None, // Will be resolved to default at runtime
            key: DEFAULT_KEY.to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            latest_size: 180,
            thumbnail_size: 64,
            quiet_zone: true,
            invert: false,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_text_length: MAX_ENCODABLE_BYTES,
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
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

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
        validate_key(&self.storage.key).map_err(|e| Error::ConfigValidation {
            message: e.to_string(),
        })?;

        if self.render.latest_size == 0 || self.render.thumbnail_size == 0 {
            return Err(Error::ConfigValidation {
                message: "latest_size and thumbnail_size must be greater than 0".to_string(),
            });
        }

        if self.input.max_text_length == 0 || self.input.max_text_length > MAX_ENCODABLE_BYTES {
            return Err(Error::ConfigValidation {
                message: format!(
                    "max_text_length must be between 1 and {MAX_ENCODABLE_BYTES}, got {}",
                    self.input.max_text_length
                ),
            });
        }

        Ok(())
    }

    /// Get the data directory, resolving defaults if not set.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        self.storage
            .data_dir
            .clone()
            .unwrap_or_else(Self::default_data_dir)
    }

    /// Get the database path used by the `SQLite` backend.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.data_dir().join(DATABASE_FILE_NAME)
    }

    /// Rendering options for the latest entry.
    #[must_use]
    pub fn latest_render_options(&self) -> RenderOptions {
        self.render_options(self.render.latest_size)
    }

    /// Rendering options for history thumbnails.
    #[must_use]
    pub fn thumbnail_render_options(&self) -> RenderOptions {
        self.render_options(self.render.thumbnail_size)
    }

    /// Rendering options at an explicit pixel size.
    #[must_use]
    pub fn render_options(&self, size: u32) -> RenderOptions {
        RenderOptions {
            size,
            quiet_zone: self.render.quiet_zone,
            invert: self.render.invert,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.storage.backend, Backend::File);
        assert_eq!(config.storage.key, "qr-history");
        assert!(config.storage.data_dir.is_none());
        assert_eq!(config.render.latest_size, 180);
        assert_eq!(config.render.thumbnail_size, 64);
        assert!(config.render.quiet_zone);
        assert!(!config.render.invert);
        assert_eq!(config.input.max_text_length, MAX_ENCODABLE_BYTES);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_key() {
        let mut config = Config::default();
        config.storage.key = "../history".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("invalid configuration"));
        assert!(err.contains("../history"));
    }

    #[test]
    fn test_validate_zero_size() {
        let mut config = Config::default();
        config.render.thumbnail_size = 0;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("thumbnail_size"));
    }

    #[test]
    fn test_validate_text_length_bounds() {
        let mut config = Config::default();
        config.input.max_text_length = 0;
        assert!(config.validate().is_err());

        config.input.max_text_length = MAX_ENCODABLE_BYTES + 1;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("max_text_length"));

        config.input.max_text_length = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_data_dir_default() {
        let config = Config::default();
        assert!(config.data_dir().to_string_lossy().contains("qrhistory"));
    }

    #[test]
    fn test_database_path_custom_dir() {
        let mut config = Config::default();
        config.storage.data_dir = Some(PathBuf::from("/custom/dir"));

        assert_eq!(config.data_dir(), PathBuf::from("/custom/dir"));
        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/dir/history.db")
        );
    }

    #[test]
    fn test_render_options() {
        let mut config = Config::default();
        config.render.invert = true;

        let latest = config.latest_render_options();
        assert_eq!(latest.size, 180);
        assert!(latest.invert);
        assert!(latest.quiet_zone);

        assert_eq!(config.thumbnail_render_options().size, 64);
        assert_eq!(config.render_options(300).size, 300);
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("qrhistory"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[storage]
backend = "sqlite"
key = "work-codes"

[render]
latest_size = 240
"#,
        )
        .unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.storage.backend, Backend::Sqlite);
        assert_eq!(config.storage.key, "work-codes");
        assert_eq!(config.render.latest_size, 240);
        assert_eq!(config.render.thumbnail_size, 64);
    }

    #[test]
    fn test_load_rejects_invalid_file_values() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[input]\nmax_text_length = 0\n").unwrap();

        let result = Config::load_from(Some(path));
        assert!(matches!(result, Err(Error::ConfigValidation { .. })));
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("\"backend\":\"file\""));
        assert!(json.contains("latest_size"));
        assert!(json.contains("max_text_length"));
    }

    #[test]
    fn test_storage_config_deserialize() {
        let json = r#"{"backend": "sqlite", "data_dir": "/tmp/qr"}"#;
        let storage: StorageConfig = serde_json::from_str(json).unwrap();
        assert_eq!(storage.backend, Backend::Sqlite);
        assert_eq!(storage.data_dir, Some(PathBuf::from("/tmp/qr")));
        assert_eq!(storage.key, DEFAULT_KEY);
    }
}
