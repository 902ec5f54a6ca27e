//! Server configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::serde_utils::duration_secs;

/// Configuration for the host service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the gateway listens on
    pub bind_address: String,

    /// Directory holding `apps.json` and `settings.json`
    pub data_dir: PathBuf,

    /// Static web client served at `/` (defaults to `<data_dir>/web`)
    pub static_dir: Option<PathBuf>,

    /// Interval between background process table scans
    #[serde(with = "duration_secs")]
    pub scan_interval: Duration,

    /// How long in-flight requests may run after shutdown is requested
    #[serde(with = "duration_secs")]
    pub shutdown_grace: Duration,

    /// PIN authentication
    pub auth: AuthConfig,

    /// Network presence advertisement
    pub discovery: DiscoveryConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            data_dir: super::default_config_dir(),
            static_dir: None,
            scan_interval: Duration::from_secs(3),
            shutdown_grace: Duration::from_secs(5),
            auth: AuthConfig::default(),
            discovery: DiscoveryConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Path of the persisted application list
    pub fn apps_path(&self) -> PathBuf {
        self.data_dir.join("apps.json")
    }

    /// Path of the persisted user settings
    pub fn settings_path(&self) -> PathBuf {
        self.data_dir.join("settings.json")
    }

    /// Directory of the static web client
    pub fn static_dir(&self) -> PathBuf {
        self.static_dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("web"))
    }

    /// Port component of the bind address, if it parses
    pub fn port(&self) -> Option<u16> {
        self.bind_address
            .rsplit(':')
            .next()
            .and_then(|p| p.parse().ok())
    }
}

/// PIN authentication settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Administrative switch; when off every request is authorized
    pub enabled: bool,

    /// Shared PIN. Authentication is only required when a PIN is set.
    pub pin: Option<String>,

    /// Sliding inactivity window after which a session expires
    #[serde(with = "duration_secs")]
    pub session_lifetime: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pin: None,
            session_lifetime: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl AuthConfig {
    /// Whether requests must carry a valid session
    pub fn is_required(&self) -> bool {
        self.enabled && self.pin.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// Discovery advertisement settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Start the advertiser alongside the gateway
    pub enabled: bool,

    /// Advertised instance name (defaults to `Aviator At <hostname>`)
    pub service_name: Option<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            service_name: None,
        }
    }
}
