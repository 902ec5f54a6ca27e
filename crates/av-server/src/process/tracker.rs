//! Launch tracking and process table reconciliation

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;

use av_core::error::{LaunchError, ScanError};
use av_core::types::AppId;

use super::launch::spawn_detached;
use super::table::ProcessTable;
use crate::registry::{AppRegistry, WatchTable};

/// app id -> observed running, from one full table scan
pub type StatusSnapshot = BTreeMap<AppId, bool>;

/// The most recent launch of an app
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchRecord {
    pub app_id: AppId,
    pub name: String,
    pub pid: u32,
    pub running: bool,
}

type LaunchMap = Arc<Mutex<HashMap<AppId, LaunchRecord>>>;

/// Spawns apps and tracks which watched apps are running
pub struct ProcessTracker {
    registry: Arc<AppRegistry>,
    watches: Arc<WatchTable>,
    table: Arc<dyn ProcessTable>,
    /// Last committed snapshot, swapped as a whole
    snapshot: RwLock<Arc<StatusSnapshot>>,
    launches: LaunchMap,
    scans: AtomicU64,
}

impl ProcessTracker {
    /// Create a tracker over the registry's apps and watch table
    pub fn new(registry: Arc<AppRegistry>, table: Arc<dyn ProcessTable>) -> Self {
        Self {
            watches: registry.watches(),
            registry,
            table,
            snapshot: RwLock::new(Arc::new(StatusSnapshot::new())),
            launches: Arc::new(Mutex::new(HashMap::new())),
            scans: AtomicU64::new(0),
        }
    }

    /// Launch a registered app, returning the new process ID
    ///
    /// The process is detached; a background thread waits for it and marks
    /// the launch record as stopped when it exits.
    pub fn launch(&self, id: &AppId) -> Result<u32, LaunchError> {
        let app = self
            .registry
            .get(id)
            .ok_or_else(|| LaunchError::NotFound(id.to_string()))?;

        tracing::info!("Launching {}: {} {}", app.name, app.path, app.args);
        let mut child = spawn_detached(&app.path, &app.args)?;
        let pid = child.id();

        self.launches.lock().insert(
            app.id.clone(),
            LaunchRecord {
                app_id: app.id.clone(),
                name: app.name.clone(),
                pid,
                running: true,
            },
        );

        let launches = Arc::clone(&self.launches);
        let app_id = app.id;
        let waiter = std::thread::Builder::new()
            .name(format!("launch-waiter-{}", pid))
            .spawn(move || {
                match child.wait() {
                    Ok(status) => tracing::info!("Process {} for app {} exited: {}", pid, app_id, status),
                    Err(e) => tracing::warn!("Failed to wait on process {} for app {}: {}", pid, app_id, e),
                }
                mark_exited(&launches, &app_id, pid);
            });

        if let Err(e) = waiter {
            tracing::warn!("Could not start exit waiter for pid {}: {}", pid, e);
        }

        Ok(pid)
    }

    /// Watch `id` under the executable filename of `path`
    pub fn add_watch(&self, id: AppId, path: &str) {
        self.watches.watch(id, path);
    }

    /// Stop watching `id`; it disappears from the next snapshot
    pub fn remove_watch(&self, id: &AppId) {
        self.watches.unwatch(id);
    }

    /// Scan the OS process table once and commit a fresh snapshot
    ///
    /// The watch table is copied under its read lock and the expensive
    /// enumeration runs with no lock held. On failure the previous snapshot
    /// stays in place.
    pub fn scan(&self) -> Result<(), ScanError> {
        self.scans.fetch_add(1, Ordering::Relaxed);
        let watched = self.watches.snapshot();

        let names = self.table.image_names()?;

        let fresh: StatusSnapshot = watched
            .into_iter()
            .map(|(id, exe)| {
                let running = names.contains(&exe);
                (id, running)
            })
            .collect();

        tracing::trace!("Scan committed {} statuses", fresh.len());
        *self.snapshot.write() = Arc::new(fresh);
        Ok(())
    }

    /// Running status of one app from the last snapshot
    pub fn get_status(&self, id: &AppId) -> bool {
        self.snapshot.read().get(id).copied().unwrap_or(false)
    }

    /// Copy of the last committed snapshot
    pub fn get_all_statuses(&self) -> StatusSnapshot {
        let snapshot = Arc::clone(&self.snapshot.read());
        (*snapshot).clone()
    }

    /// The most recent launch of `id`, if any
    pub fn launch_record(&self, id: &AppId) -> Option<LaunchRecord> {
        self.launches.lock().get(id).cloned()
    }

    /// `(running, pid)` of the most recent launch, `(false, 0)` if never launched
    pub fn launch_status(&self, id: &AppId) -> (bool, u32) {
        self.launch_record(id)
            .map(|record| (record.running, record.pid))
            .unwrap_or((false, 0))
    }

    /// Number of scans attempted so far
    pub fn scan_count(&self) -> u64 {
        self.scans.load(Ordering::Relaxed)
    }
}

/// Flip a launch record to stopped, unless a newer launch replaced it
fn mark_exited(launches: &Mutex<HashMap<AppId, LaunchRecord>>, id: &AppId, pid: u32) {
    if let Some(record) = launches.lock().get_mut(id) {
        if record.pid == pid {
            record.running = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use av_core::icons::NoIcons;
    use av_core::store::JsonStore;
    use std::time::Duration;

    use crate::process::table::testing::FakeTable;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Arc<AppRegistry>, Arc<FakeTable>, ProcessTracker) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(JsonStore::in_dir(dir.path()));
        let registry = Arc::new(AppRegistry::load(store, Arc::new(NoIcons)).unwrap());
        let table = Arc::new(FakeTable::default());
        let tracker = ProcessTracker::new(Arc::clone(&registry), table.clone());
        (dir, registry, table, tracker)
    }

    #[test]
    fn test_scan_reports_watched_running() {
        let (_dir, registry, table, tracker) = setup();
        let game = registry.add("Game", r"C:\Games\Game.exe", "");
        let editor = registry.add("Editor", "/usr/bin/editor", "");

        table.set(&["game.exe", "game.exe", "init"]);
        tracker.scan().unwrap();
        assert!(tracker.get_status(&game.id));
        assert!(!tracker.get_status(&editor.id));
        assert_eq!(tracker.get_all_statuses().len(), 2);

        table.set(&["init"]);
        tracker.scan().unwrap();
        assert!(!tracker.get_status(&game.id));
    }

    #[test]
    fn test_statuses_only_change_on_scan() {
        let (_dir, registry, table, tracker) = setup();
        let game = registry.add("Game", "/opt/game", "");
        table.set(&["game"]);
        assert!(!tracker.get_status(&game.id));
        assert!(tracker.get_all_statuses().is_empty());
        assert_eq!(tracker.scan_count(), 0);
    }

    #[test]
    fn test_removed_watch_disappears_from_snapshot() {
        let (_dir, registry, table, tracker) = setup();
        let game = registry.add("Game", "/opt/game", "");
        table.set(&["game"]);
        tracker.scan().unwrap();
        assert!(tracker.get_status(&game.id));

        tracker.remove_watch(&game.id);
        tracker.scan().unwrap();
        assert!(!tracker.get_all_statuses().contains_key(&game.id));
        assert!(!tracker.get_status(&game.id));
    }

    #[test]
    fn test_add_watch_retargets() {
        let (_dir, registry, table, tracker) = setup();
        let game = registry.add("Game", "/opt/game", "");
        tracker.add_watch(game.id.clone(), "/opt/Other");
        table.set(&["other"]);
        tracker.scan().unwrap();
        assert!(tracker.get_status(&game.id));
    }

    #[test]
    fn test_failed_scan_keeps_previous_snapshot() {
        let (_dir, registry, table, tracker) = setup();
        let game = registry.add("Game", "/opt/game", "");
        table.set(&["game"]);
        tracker.scan().unwrap();

        table.fail(true);
        table.set(&[]);
        assert!(tracker.scan().is_err());
        assert!(tracker.get_status(&game.id));
        assert_eq!(tracker.scan_count(), 2);
    }

    #[test]
    fn test_launch_unknown_app() {
        let (_dir, _registry, _table, tracker) = setup();
        assert!(matches!(
            tracker.launch(&AppId::new("ghost")),
            Err(LaunchError::NotFound(_))
        ));
    }

    #[test]
    fn test_launch_missing_executable_leaves_no_record() {
        let (_dir, registry, _table, tracker) = setup();
        let app = registry.add("Missing", "/no/such/binary", "");
        assert!(matches!(tracker.launch(&app.id), Err(LaunchError::Failed(_))));
        assert!(tracker.launch_record(&app.id).is_none());
        assert_eq!(tracker.launch_status(&app.id), (false, 0));
    }

    #[test]
    fn test_stale_waiter_does_not_clear_newer_launch() {
        let launches = Mutex::new(HashMap::new());
        let id = AppId::new("a");
        launches.lock().insert(
            id.clone(),
            LaunchRecord {
                app_id: id.clone(),
                name: "A".to_string(),
                pid: 200,
                running: true,
            },
        );

        mark_exited(&launches, &id, 100);
        assert!(launches.lock()[&id].running);
        mark_exited(&launches, &id, 200);
        assert!(!launches.lock()[&id].running);
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_waiter_marks_record_stopped() {
        let Some(true_bin) = ["/bin/true", "/usr/bin/true"]
            .into_iter()
            .find(|p| std::path::Path::new(p).exists())
        else {
            return;
        };
        let (_dir, registry, _table, tracker) = setup();
        let app = registry.add("True", true_bin, "");

        let pid = tracker.launch(&app.id).unwrap();
        assert_eq!(tracker.launch_record(&app.id).unwrap().pid, pid);

        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while tracker.launch_status(&app.id).0 {
            assert!(std::time::Instant::now() < deadline, "waiter never fired");
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(tracker.launch_status(&app.id), (false, pid));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_table_tracks_launch_and_exit() {
        use crate::process::table::SystemProcessTable;

        let Some(sleep_bin) = ["/bin/sleep", "/usr/bin/sleep"]
            .into_iter()
            .find(|p| std::path::Path::new(p).exists())
        else {
            return;
        };

        // Longer than the 15 characters the kernel keeps in the process name
        let dir = TempDir::new().unwrap();
        let exe = dir.path().join("aviator-long-sleeper");
        std::fs::copy(sleep_bin, &exe).unwrap();

        let store = Arc::new(JsonStore::in_dir(dir.path()));
        let registry = Arc::new(AppRegistry::load(store, Arc::new(NoIcons)).unwrap());
        let tracker = ProcessTracker::new(Arc::clone(&registry), Arc::new(SystemProcessTable::new()));
        let app = registry.add("Sleeper", &exe.to_string_lossy(), "1");

        let pid = tracker.launch(&app.id).unwrap();
        tracker.scan().unwrap();
        assert!(tracker.get_status(&app.id));

        let deadline = std::time::Instant::now() + Duration::from_secs(10);
        while tracker.launch_status(&app.id).0 {
            assert!(std::time::Instant::now() < deadline, "process never exited");
            std::thread::sleep(Duration::from_millis(20));
        }
        tracker.scan().unwrap();
        assert!(!tracker.get_status(&app.id));
        assert_eq!(tracker.launch_status(&app.id), (false, pid));
    }
}
