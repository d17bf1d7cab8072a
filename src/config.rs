//! # Configuration Management Module
//!
//! Persistent settings stored in the platform config directory.
//! Handles loading, saving, and providing defaults for configuration options.
//!
//! ## Settings
//! - `host`, `port`: address the ingestion server listens on
//! - `output_dir`: where saved recordings are written
//! - `start_recording`: begin in the recording state (development setups)
//!
//! ## Storage Location
//! - macOS: ~/Library/Application Support/motion-recorder/config.toml
//! - Linux: ~/.config/motion-recorder/config.toml
//! - Windows: %APPDATA%\motion-recorder\config.toml
//!
//! Buffer capacity and the chart refresh interval are not configurable;
//! see `BUFFER_CAPACITY` and `UPDATE_FREQ_MS`.

use crate::error::ConfigError;
use crate::recording::RecordingStatus;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub output_dir: PathBuf,
    pub start_recording: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            output_dir: PathBuf::from("."),
            start_recording: false,
        }
    }
}

impl Config {
    /// Get the path to the config file
    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("motion-recorder")
            .join("config.toml")
    }

    /// Load config from the default location, creating it if missing
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).map_err(ConfigError::ParseFailed),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.save_to(path)?;
                Ok(config)
            }
            Err(e) => Err(ConfigError::ReadFailed(e)),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::WriteFailed)?;
        }

        let toml_string = toml::to_string_pretty(self).map_err(ConfigError::SerializeFailed)?;
        fs::write(path, toml_string).map_err(ConfigError::WriteFailed)?;

        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn initial_recording(&self) -> RecordingStatus {
        if self.start_recording {
            RecordingStatus::Active
        } else {
            RecordingStatus::Idle
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.listen_addr(), "0.0.0.0:8000");
        assert_eq!(config.initial_recording(), RecordingStatus::Idle);
    }

    #[test]
    fn test_config_deserialization_fills_defaults() {
        let toml_str = r#"
            port = 9000
            start_recording = true
        "#;

        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize");
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.initial_recording(), RecordingStatus::Active);
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).expect("Failed to load config");

        assert_eq!(config, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 8123,
            output_dir: PathBuf::from("recordings"),
            start_recording: true,
        };

        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_broken_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "port = \"eighty\"").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }
}
