//! Configuration management for Aviator

mod server;
pub mod serde_utils;

pub use server::{AuthConfig, DiscoveryConfig, ServerConfig};

use crate::error::ConfigError;
use std::path::{Path, PathBuf};

/// Directory name used under the platform config dir
const APP_DIR_NAME: &str = "aviator";

/// Get the default configuration directory
pub fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Get the default configuration file path
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.toml")
}

/// Load configuration from a file
pub fn load_config<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Invalid(format!("Failed to read config: {}", e)))?;

    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load the config at `path`, or the default location, falling back to defaults
///
/// An explicitly given path must exist; a missing default file is not an error.
pub fn load_or_default(path: Option<&Path>) -> Result<ServerConfig, ConfigError> {
    if let Some(path) = path {
        return load_config(path);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        load_config(&default_path)
    } else {
        tracing::info!("No config at {:?}, using defaults", default_path);
        Ok(ServerConfig::default())
    }
}

/// Save configuration to a file
pub fn save_config<T: serde::Serialize>(path: &Path, config: &T) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ConfigError::Invalid(format!("Failed to create config dir: {}", e)))?;
    }

    std::fs::write(path, content)
        .map_err(|e| ConfigError::Invalid(format!("Failed to write config: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = ServerConfig::default();
        config.bind_address = "127.0.0.1:9000".to_string();
        config.auth.pin = Some("1234".to_string());
        save_config(&path, &config).unwrap();

        let loaded: ServerConfig = load_config(&path).unwrap();
        assert_eq!(loaded.bind_address, "127.0.0.1:9000");
        assert_eq!(loaded.auth.pin.as_deref(), Some("1234"));
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            load_or_default(Some(&missing)),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[auth]\npin = \"0000\"\n").unwrap();

        let loaded: ServerConfig = load_config(&path).unwrap();
        assert_eq!(loaded.bind_address, ServerConfig::default().bind_address);
        assert!(loaded.auth.enabled);
        assert_eq!(loaded.auth.pin.as_deref(), Some("0000"));
    }
}
