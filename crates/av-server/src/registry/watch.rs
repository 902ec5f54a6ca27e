//! Watch table: app id -> executable filename used for process matching

use std::collections::HashMap;

use parking_lot::RwLock;

use av_core::types::{executable_name, AppId, AppRecord};

/// Maps watched app ids to lowercased executable filenames
///
/// Only the base filename is kept, so the directory and arguments of an app
/// never influence matching.
#[derive(Debug, Default)]
pub struct WatchTable {
    entries: RwLock<HashMap<AppId, String>>,
}

impl WatchTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Watch `id`, replacing any previous entry
    pub fn watch(&self, id: AppId, path: &str) {
        self.entries.write().insert(id, executable_name(path));
    }

    /// Stop watching `id`
    pub fn unwatch(&self, id: &AppId) {
        self.entries.write().remove(id);
    }

    /// Rebuild the table so it holds exactly one entry per record
    pub fn replace_all(&self, apps: &[AppRecord]) {
        let fresh = apps
            .iter()
            .map(|app| (app.id.clone(), app.executable_name()))
            .collect();
        *self.entries.write() = fresh;
    }

    /// Copy of the current entries
    pub fn snapshot(&self) -> HashMap<AppId, String> {
        self.entries.read().clone()
    }

    /// Watched filename for `id`
    pub fn get(&self, id: &AppId) -> Option<String> {
        self.entries.read().get(id).cloned()
    }

    /// Number of watched apps
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if nothing is watched
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
