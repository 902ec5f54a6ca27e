//! Persistence collaborator
//!
//! The core only relies on the [`AppStore`] contract: it round-trips the
//! application list and the user settings. [`JsonStore`] keeps both as
//! pretty-printed JSON files in the data directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::types::{AppRecord, Settings};

/// Durable storage for registered applications and settings
pub trait AppStore: Send + Sync {
    /// Load the persisted application list (empty when nothing was saved yet)
    fn load_apps(&self) -> Result<Vec<AppRecord>, StoreError>;

    /// Replace the persisted application list
    fn save_apps(&self, apps: &[AppRecord]) -> Result<(), StoreError>;

    /// Load persisted settings (defaults when nothing was saved yet)
    fn load_settings(&self) -> Result<Settings, StoreError>;

    /// Replace persisted settings
    fn save_settings(&self, settings: &Settings) -> Result<(), StoreError>;

    /// Last modification time of the application list, if the backend knows it
    fn apps_modified(&self) -> Option<SystemTime> {
        None
    }
}

/// JSON files on disk
#[derive(Debug, Clone)]
pub struct JsonStore {
    apps_path: PathBuf,
    settings_path: PathBuf,
}

impl JsonStore {
    /// Store using explicit file paths
    pub fn new(apps_path: impl Into<PathBuf>, settings_path: impl Into<PathBuf>) -> Self {
        Self {
            apps_path: apps_path.into(),
            settings_path: settings_path.into(),
        }
    }

    /// Store using `apps.json` and `settings.json` inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("apps.json"), dir.join("settings.json"))
    }

    /// Path of the application list
    pub fn apps_path(&self) -> &Path {
        &self.apps_path
    }
}

impl AppStore for JsonStore {
    fn load_apps(&self) -> Result<Vec<AppRecord>, StoreError> {
        Ok(read_json(&self.apps_path)?.unwrap_or_default())
    }

    fn save_apps(&self, apps: &[AppRecord]) -> Result<(), StoreError> {
        write_json(&self.apps_path, &apps)
    }

    fn load_settings(&self) -> Result<Settings, StoreError> {
        Ok(read_json(&self.settings_path)?.unwrap_or_default())
    }

    fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        write_json(&self.settings_path, settings)
    }

    fn apps_modified(&self) -> Option<SystemTime> {
        fs::metadata(&self.apps_path)
            .and_then(|m| m.modified())
            .ok()
    }
}

/// Read a JSON file, `Ok(None)` if it does not exist
fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&contents)
        .map(Some)
        .map_err(|source| StoreError::Format {
            path: path.to_path_buf(),
            source,
        })
}

/// Write a JSON file through a sibling temp file so readers never see a torn write
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Format {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AppId;
    use tempfile::TempDir;

    fn app(id: &str) -> AppRecord {
        AppRecord {
            id: AppId::new(id),
            name: format!("App {}", id),
            path: format!("/opt/{}/run", id),
            args: "--fullscreen".to_string(),
            icon: String::new(),
        }
    }

    #[test]
    fn test_missing_files_load_as_defaults() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::in_dir(dir.path());
        assert!(store.load_apps().unwrap().is_empty());
        assert_eq!(store.load_settings().unwrap(), Settings::default());
        assert!(store.apps_modified().is_none());
    }

    #[test]
    fn test_apps_persist_in_order() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::in_dir(&dir.path().join("data"));

        store.save_apps(&[app("b"), app("a")]).unwrap();
        let loaded = store.load_apps().unwrap();
        assert_eq!(loaded, vec![app("b"), app("a")]);
        assert!(store.apps_modified().is_some());
        assert!(!dir.path().join("data").join("apps.json.tmp").exists());
    }

    #[test]
    fn test_settings_persist() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::in_dir(dir.path());
        store.save_settings(&Settings { auto_start: true }).unwrap();
        assert!(store.load_settings().unwrap().auto_start);
    }

    #[test]
    fn test_malformed_file_is_format_error() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::in_dir(dir.path());
        fs::write(store.apps_path(), "{not json").unwrap();
        assert!(matches!(store.load_apps(), Err(StoreError::Format { .. })));
    }
}
