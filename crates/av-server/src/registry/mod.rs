//! Application registry
//!
//! Owns the registered [`AppRecord`]s and the [`WatchTable`] derived from
//! them. Every mutation updates the list and the watch table under the same
//! write lock, then persists through the [`AppStore`].
//!
//! # Durability
//!
//! Persistence failures are logged but never roll back the in-memory change;
//! the next successful save resynchronizes the file. Mutations, saves and
//! reloads all hold the persistence lock from the in-memory change through
//! the save, so a reload can never discard a mutation that has not reached
//! the store yet.

mod watch;

pub use watch::WatchTable;

use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::{Mutex, RwLock};

use av_core::error::StoreError;
use av_core::icons::IconSource;
use av_core::store::AppStore;
use av_core::types::{AppId, AppRecord};

/// Concurrent store of launchable applications
pub struct AppRegistry {
    apps: RwLock<Vec<AppRecord>>,
    watches: Arc<WatchTable>,
    store: Arc<dyn AppStore>,
    icons: Arc<dyn IconSource>,
    /// Serializes mutations, saves and reloads; holds the store mtime
    /// observed after our last load or save
    persisted_at: Mutex<Option<SystemTime>>,
}

impl AppRegistry {
    /// Create a registry from whatever the store currently holds
    pub fn load(store: Arc<dyn AppStore>, icons: Arc<dyn IconSource>) -> Result<Self, StoreError> {
        let apps = store.load_apps()?;
        let watches = Arc::new(WatchTable::new());
        watches.replace_all(&apps);
        tracing::info!("Loaded {} registered apps", apps.len());

        Ok(Self {
            apps: RwLock::new(apps),
            watches,
            persisted_at: Mutex::new(store.apps_modified()),
            store,
            icons,
        })
    }

    /// Watch table derived from the registered apps
    pub fn watches(&self) -> Arc<WatchTable> {
        Arc::clone(&self.watches)
    }

    /// All apps in registration order
    pub fn list(&self) -> Vec<AppRecord> {
        self.apps.read().clone()
    }

    /// Look up an app by ID
    pub fn get(&self, id: &AppId) -> Option<AppRecord> {
        self.apps.read().iter().find(|app| &app.id == id).cloned()
    }

    /// Number of registered apps
    pub fn len(&self) -> usize {
        self.apps.read().len()
    }

    /// Check if no apps are registered
    pub fn is_empty(&self) -> bool {
        self.apps.read().is_empty()
    }

    /// Register a new app under a fresh ID
    ///
    /// Icon derivation is best effort; a failure leaves the icon empty.
    pub fn add(&self, name: &str, path: &str, args: &str) -> AppRecord {
        let icon = self.icons.derive_icon(path).unwrap_or_else(|e| {
            tracing::warn!("Could not derive icon for {}: {}", path, e);
            String::new()
        });

        let app = AppRecord {
            id: AppId::generate(),
            name: name.to_string(),
            path: path.to_string(),
            args: args.to_string(),
            icon,
        };

        let mut persisted_at = self.persisted_at.lock();
        {
            let mut apps = self.apps.write();
            apps.push(app.clone());
            self.watches.watch(app.id.clone(), &app.path);
        }

        tracing::info!("Registered app {} ({})", app.name, app.id);
        self.persist(&mut persisted_at);
        app
    }

    /// Update an existing app. Returns `false` if the ID is unknown.
    ///
    /// A changed path re-derives the icon, keeping the previous icon if that
    /// fails, and re-targets the watch entry.
    pub fn update(&self, id: &AppId, name: &str, path: &str, args: &str) -> bool {
        let Some(current) = self.get(id) else {
            return false;
        };

        let icon = if current.path != path {
            self.icons.derive_icon(path).unwrap_or_else(|e| {
                tracing::warn!("Could not derive icon for {}: {}", path, e);
                current.icon.clone()
            })
        } else {
            current.icon.clone()
        };

        let mut persisted_at = self.persisted_at.lock();
        {
            let mut apps = self.apps.write();
            let Some(app) = apps.iter_mut().find(|app| &app.id == id) else {
                // Removed or reloaded away while the icon was being derived
                return false;
            };
            app.name = name.to_string();
            app.path = path.to_string();
            app.args = args.to_string();
            app.icon = icon;
            self.watches.watch(id.clone(), path);
        }

        tracing::info!("Updated app {}", id);
        self.persist(&mut persisted_at);
        true
    }

    /// Remove an app. Unknown IDs are a no-op.
    pub fn remove(&self, id: &AppId) {
        let mut persisted_at = self.persisted_at.lock();
        let removed = {
            let mut apps = self.apps.write();
            let before = apps.len();
            apps.retain(|app| &app.id != id);
            self.watches.unwatch(id);
            apps.len() != before
        };

        if removed {
            tracing::info!("Removed app {}", id);
            self.persist(&mut persisted_at);
        }
    }

    /// Re-read the store, replacing the list and the watch table wholesale
    pub fn reload(&self) -> Result<(), StoreError> {
        let mut persisted_at = self.persisted_at.lock();
        let fresh = self.store.load_apps()?;
        {
            let mut apps = self.apps.write();
            self.watches.replace_all(&fresh);
            *apps = fresh;
        }
        *persisted_at = self.store.apps_modified();
        tracing::info!("Reloaded {} apps from storage", self.len());
        Ok(())
    }

    /// Reload if the backing file changed since our last load or save
    pub fn reload_if_changed(&self) -> Result<bool, StoreError> {
        let modified = self.store.apps_modified();
        if modified.is_none() || modified == *self.persisted_at.lock() {
            return Ok(false);
        }
        self.reload()?;
        Ok(true)
    }

    /// Persist the current list, returning the store's error
    pub fn flush(&self) -> Result<(), StoreError> {
        let mut persisted_at = self.persisted_at.lock();
        self.save(&mut persisted_at)
    }

    /// Save the list; the caller holds the persistence lock
    fn save(&self, persisted_at: &mut Option<SystemTime>) -> Result<(), StoreError> {
        let snapshot = self.list();
        self.store.save_apps(&snapshot)?;
        *persisted_at = self.store.apps_modified();
        Ok(())
    }

    fn persist(&self, persisted_at: &mut Option<SystemTime>) {
        if let Err(e) = self.save(persisted_at) {
            tracing::error!("Failed to persist app registry: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use av_core::error::IconError;
    use av_core::icons::NoIcons;
    use av_core::types::Settings;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc;
    use std::time::Duration;

    /// In-memory store that can be told to fail saves or pause the next load
    #[derive(Default)]
    struct MemoryStore {
        apps: Mutex<Vec<AppRecord>>,
        fail_saves: AtomicBool,
        /// Signals the first sender once a load starts, then waits on the receiver
        load_gate: Mutex<Option<(mpsc::Sender<()>, mpsc::Receiver<()>)>>,
    }

    impl AppStore for MemoryStore {
        fn load_apps(&self) -> Result<Vec<AppRecord>, StoreError> {
            let gate = self.load_gate.lock().take();
            if let Some((entered, release)) = gate {
                let _ = entered.send(());
                let _ = release.recv();
            }
            Ok(self.apps.lock().clone())
        }

        fn save_apps(&self, apps: &[AppRecord]) -> Result<(), StoreError> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(StoreError::Io {
                    path: "memory".into(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
                });
            }
            *self.apps.lock() = apps.to_vec();
            Ok(())
        }

        fn load_settings(&self) -> Result<Settings, StoreError> {
            Ok(Settings::default())
        }

        fn save_settings(&self, _: &Settings) -> Result<(), StoreError> {
            Ok(())
        }
    }

    /// Icons derived from the path; paths containing "noicon" fail
    struct PathIcons;

    impl IconSource for PathIcons {
        fn derive_icon(&self, executable: &str) -> Result<String, IconError> {
            if executable.contains("noicon") {
                Err(IconError::NotFound(executable.to_string()))
            } else {
                Ok(format!("icon:{}", executable))
            }
        }
    }

    fn registry_with(store: Arc<MemoryStore>) -> AppRegistry {
        AppRegistry::load(store, Arc::new(PathIcons)).unwrap()
    }

    #[test]
    fn test_add_assigns_unique_ids_and_watches() {
        let store = Arc::new(MemoryStore::default());
        let registry = registry_with(store.clone());

        let a = registry.add("A", "/bin/Alpha", "");
        let b = registry.add("B", "/bin/beta", "-x");
        assert_ne!(a.id, b.id);
        assert_eq!(a.icon, "icon:/bin/Alpha");

        assert_eq!(registry.list(), vec![a.clone(), b.clone()]);
        assert_eq!(registry.watches().get(&a.id).as_deref(), Some("alpha"));
        assert_eq!(store.load_apps().unwrap().len(), 2);
    }

    #[test]
    fn test_add_with_icon_failure_uses_empty_icon() {
        let registry = AppRegistry::load(Arc::new(MemoryStore::default()), Arc::new(NoIcons)).unwrap();
        let app = registry.add("A", "/bin/a", "");
        assert!(app.icon.is_empty());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_update_rederives_icon_only_on_path_change() {
        let registry = registry_with(Arc::new(MemoryStore::default()));
        let app = registry.add("A", "/bin/a", "");

        assert!(registry.update(&app.id, "Renamed", "/bin/a", "--flag"));
        let updated = registry.get(&app.id).unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.args, "--flag");
        assert_eq!(updated.icon, "icon:/bin/a");

        assert!(registry.update(&app.id, "Renamed", "/opt/b", ""));
        assert_eq!(registry.get(&app.id).unwrap().icon, "icon:/opt/b");
        assert_eq!(registry.watches().get(&app.id).as_deref(), Some("b"));
    }

    #[test]
    fn test_update_keeps_previous_icon_on_failure() {
        let registry = registry_with(Arc::new(MemoryStore::default()));
        let app = registry.add("A", "/bin/a", "");
        assert!(registry.update(&app.id, "A", "/bin/noicon", ""));
        assert_eq!(registry.get(&app.id).unwrap().icon, "icon:/bin/a");
    }

    #[test]
    fn test_update_unknown_id() {
        let registry = registry_with(Arc::new(MemoryStore::default()));
        assert!(!registry.update(&AppId::new("nope"), "x", "/x", ""));
    }

    #[test]
    fn test_remove_is_idempotent() {
        let registry = registry_with(Arc::new(MemoryStore::default()));
        let a = registry.add("A", "/bin/a", "");
        let b = registry.add("B", "/bin/b", "");

        registry.remove(&a.id);
        registry.remove(&a.id);
        registry.remove(&AppId::new("unknown"));

        assert_eq!(registry.list(), vec![b.clone()]);
        assert!(registry.get(&a.id).is_none());
        assert!(registry.watches().get(&a.id).is_none());
        assert_eq!(registry.watches().len(), 1);
    }

    #[test]
    fn test_mixed_sequence_leaves_exact_survivors() {
        let registry = registry_with(Arc::new(MemoryStore::default()));
        let mut expected = Vec::new();
        for i in 0..10 {
            let app = registry.add(&format!("app{}", i), &format!("/bin/app{}", i), "");
            expected.push(app);
        }
        for app in expected.iter().step_by(3) {
            registry.remove(&app.id);
        }
        expected = expected
            .into_iter()
            .enumerate()
            .filter(|(i, _)| i % 3 != 0)
            .map(|(_, app)| app)
            .collect();

        let listed = registry.list();
        assert_eq!(listed, expected);
        for app in &listed {
            assert_eq!(registry.get(&app.id).as_ref(), Some(app));
        }
        assert_eq!(registry.watches().len(), listed.len());
    }

    #[test]
    fn test_persistence_failure_keeps_memory_state() {
        let store = Arc::new(MemoryStore::default());
        let registry = registry_with(store.clone());
        store.fail_saves.store(true, Ordering::SeqCst);

        let app = registry.add("A", "/bin/a", "");
        assert_eq!(registry.get(&app.id), Some(app.clone()));
        assert!(store.load_apps().unwrap().is_empty());
        assert!(registry.flush().is_err());

        store.fail_saves.store(false, Ordering::SeqCst);
        registry.flush().unwrap();
        assert_eq!(store.load_apps().unwrap(), vec![app]);
    }

    #[test]
    fn test_reload_replaces_list_and_watches() {
        let store = Arc::new(MemoryStore::default());
        let registry = registry_with(store.clone());
        let stale = registry.add("Old", "/bin/old", "");

        let external = AppRecord {
            id: AppId::new("external"),
            name: "New".to_string(),
            path: "/bin/new".to_string(),
            args: String::new(),
            icon: String::new(),
        };
        *store.apps.lock() = vec![external.clone()];

        registry.reload().unwrap();
        assert_eq!(registry.list(), vec![external.clone()]);
        assert!(registry.watches().get(&stale.id).is_none());
        assert_eq!(registry.watches().get(&external.id).as_deref(), Some("new"));
    }

    #[test]
    fn test_add_during_reload_survives() {
        let store = Arc::new(MemoryStore::default());
        let registry = Arc::new(registry_with(store.clone()));

        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        *store.load_gate.lock() = Some((entered_tx, release_rx));

        let reloading = {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || registry.reload())
        };
        entered_rx.recv().unwrap();

        let adding = {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || registry.add("New", "/bin/new", ""))
        };
        // Give the add a chance to race the paused reload
        std::thread::sleep(Duration::from_millis(50));
        release_tx.send(()).unwrap();

        reloading.join().unwrap().unwrap();
        let added = adding.join().unwrap();

        assert_eq!(registry.get(&added.id), Some(added.clone()));
        assert_eq!(registry.watches().get(&added.id).as_deref(), Some("new"));
        assert_eq!(store.load_apps().unwrap(), vec![added]);
    }
}
