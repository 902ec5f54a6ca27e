//! Core error types for Aviator

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the Aviator crates
#[derive(Error, Debug)]
pub enum AvError {
    /// Persistence error
    #[error("Persistence error: {0}")]
    Store(#[from] StoreError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Launch error
    #[error("Launch error: {0}")]
    Launch(#[from] LaunchError),

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Process table scan error
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Auto-start error
    #[error("Auto-start error: {0}")]
    AutoStart(#[from] AutoStartError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Persistence failures. The in-memory state stays authoritative.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file holds malformed JSON
    #[error("Malformed data in {path}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Failures of the launch path
#[derive(Error, Debug)]
pub enum LaunchError {
    /// Unknown app id
    #[error("App not found: {0}")]
    NotFound(String),

    /// Executable missing or the OS refused to create the process
    #[error("Launch failed: {0}")]
    Failed(String),
}

/// Authentication errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    /// Wrong PIN, or a missing/invalid/expired session
    #[error("Unauthorized")]
    Unauthorized,
}

/// OS process enumeration failed; the previous snapshot stays authoritative
#[derive(Error, Debug)]
#[error("Process table scan failed: {0}")]
pub struct ScanError(pub String);

/// Icon derivation failures (never fatal to registry operations)
#[derive(Error, Debug)]
pub enum IconError {
    /// No icon could be found for the executable
    #[error("No icon found for {0}")]
    NotFound(String),

    /// The icon file could not be read
    #[error("Failed to read icon: {0}")]
    Io(#[from] std::io::Error),
}

/// Auto-start registration errors
#[derive(Error, Debug)]
pub enum AutoStartError {
    /// The platform has no supported auto-start mechanism
    #[error("Auto-start is not supported on this platform")]
    Unsupported,

    /// Writing or removing the registration failed
    #[error("Failed to update auto-start entry: {0}")]
    Io(#[from] std::io::Error),
}
