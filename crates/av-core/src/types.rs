//! Core domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, immutable identifier of a registered application
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(pub String);

impl AppId {
    /// Create an app ID from an existing string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Allocate a fresh random ID
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the raw ID string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AppId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AppId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A registered launchable application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRecord {
    /// Unique identifier
    pub id: AppId,
    /// Display name
    pub name: String,
    /// Absolute path to the executable
    pub path: String,
    /// Raw argument string, split on whitespace at launch time
    #[serde(default)]
    pub args: String,
    /// Base64 encoded icon image, empty when none could be derived
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub icon: String,
}

impl AppRecord {
    /// Lowercased base filename of the executable.
    ///
    /// Both `/` and `\` are treated as separators so that records written on
    /// one platform still match process names on another.
    pub fn executable_name(&self) -> String {
        executable_name(&self.path)
    }
}

/// Lowercased base filename of an executable path
pub fn executable_name(path: &str) -> String {
    path.rsplit(['/', '\\'])
        .next()
        .unwrap_or(path)
        .to_lowercase()
}

/// User preferences persisted next to the app list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Start the host service on login
    #[serde(default)]
    pub auto_start: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(AppId::generate(), AppId::generate());
    }

    #[test]
    fn test_executable_name_strips_directories() {
        assert_eq!(executable_name("/usr/bin/Steam"), "steam");
        assert_eq!(executable_name(r"C:\Games\Doom\DOOM.exe"), "doom.exe");
        assert_eq!(executable_name("plain"), "plain");
    }

    #[test]
    fn test_app_record_json_shape() {
        let app = AppRecord {
            id: AppId::new("abc"),
            name: "Editor".to_string(),
            path: "/usr/bin/vim".to_string(),
            args: "-n".to_string(),
            icon: String::new(),
        };
        let json = serde_json::to_value(&app).unwrap();
        assert_eq!(json["id"], "abc");
        assert!(json.get("icon").is_none());

        let parsed: AppRecord =
            serde_json::from_str(r#"{"id":"x","name":"n","path":"/p"}"#).unwrap();
        assert_eq!(parsed.args, "");
        assert_eq!(parsed.icon, "");
    }
}
