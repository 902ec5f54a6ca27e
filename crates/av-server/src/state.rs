//! Shared server state

use std::sync::Arc;

use av_core::config::ServerConfig;
use av_core::error::StoreError;
use av_core::icons::{IconSource, SidecarIcons};
use av_core::store::{AppStore, JsonStore};

use crate::auth::SessionStore;
use crate::process::{ProcessTable, ProcessTracker, StatusCache, SystemProcessTable};
use crate::registry::AppRegistry;

/// State shared by the gateway handlers and the background monitor
pub struct ServerState {
    /// Configuration
    pub config: ServerConfig,
    /// Registered apps and their watch entries
    pub registry: Arc<AppRegistry>,
    /// Login sessions
    pub sessions: Arc<SessionStore>,
    /// Launches and process status snapshots
    pub tracker: Arc<ProcessTracker>,
    /// Rate-limited view of the tracker's statuses
    pub status_cache: Arc<StatusCache>,
}

impl ServerState {
    /// Build state backed by the data directory and the OS process table
    pub fn new(config: ServerConfig) -> Result<Self, StoreError> {
        let store = Arc::new(JsonStore::new(config.apps_path(), config.settings_path()));
        Self::with_parts(
            config,
            store,
            Arc::new(SidecarIcons),
            Arc::new(SystemProcessTable::new()),
        )
    }

    /// Build state from explicit collaborators
    pub fn with_parts(
        config: ServerConfig,
        store: Arc<dyn AppStore>,
        icons: Arc<dyn IconSource>,
        table: Arc<dyn ProcessTable>,
    ) -> Result<Self, StoreError> {
        let registry = Arc::new(AppRegistry::load(store, icons)?);
        let sessions = Arc::new(SessionStore::new(&config.auth));
        let tracker = Arc::new(ProcessTracker::new(Arc::clone(&registry), table));
        let status_cache = Arc::new(StatusCache::new(Arc::clone(&tracker)));

        if sessions.is_required() {
            tracing::info!("PIN authentication required");
        } else {
            tracing::warn!("No PIN configured, API is open to the network");
        }

        Ok(Self {
            config,
            registry,
            sessions,
            tracker,
            status_cache,
        })
    }
}
