//! User settings
//!
//! Settings are persisted through the [`AppStore`], but the auto-start flag is
//! owned by the OS: on load the live registration wins over the file, and an
//! update applies the OS change before persisting.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::autostart::AutoStart;
use crate::error::AvError;
use crate::store::AppStore;
use crate::types::Settings;

/// Reads and applies [`Settings`]
pub struct SettingsService {
    store: Arc<dyn AppStore>,
    autostart: Arc<dyn AutoStart>,
    current: RwLock<Settings>,
}

impl SettingsService {
    /// Load persisted settings and reconcile them with the OS
    ///
    /// A missing or unreadable settings file degrades to defaults.
    pub fn load(store: Arc<dyn AppStore>, autostart: Arc<dyn AutoStart>) -> Self {
        let mut settings = store.load_settings().unwrap_or_else(|e| {
            tracing::warn!("Failed to load settings, using defaults: {}", e);
            Settings::default()
        });
        settings.auto_start = autostart.is_enabled();

        Self {
            store,
            autostart,
            current: RwLock::new(settings),
        }
    }

    /// Current settings
    pub fn get(&self) -> Settings {
        *self.current.read()
    }

    /// Apply and persist new settings
    ///
    /// An auto-start failure leaves both the current value and the file
    /// untouched. Once the OS accepts the change it becomes current, even if
    /// the save then fails.
    pub fn update(&self, settings: Settings) -> Result<(), AvError> {
        self.autostart.set_enabled(settings.auto_start)?;
        *self.current.write() = settings;
        self.store.save_settings(&settings)?;
        Ok(())
    }
}
