//! Periodic background maintenance
//!
//! Every tick the monitor:
//! - scans the process table so statuses stay warm between requests
//! - reloads the app list if another process (the CLI) rewrote it
//! - drops expired session tokens

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::state::ServerState;

/// Run the maintenance loop until `cancel` fires
pub async fn run_monitor(state: Arc<ServerState>, interval: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    tracing::info!("Starting process monitor (interval: {:?})", interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let state = Arc::clone(&state);
                if let Err(e) = tokio::task::spawn_blocking(move || tick(&state)).await {
                    tracing::error!("Monitor tick panicked: {}", e);
                }
            }
            _ = cancel.cancelled() => {
                tracing::info!("Process monitor shutting down");
                break;
            }
        }
    }
}

fn tick(state: &ServerState) {
    match state.registry.reload_if_changed() {
        Ok(true) => tracing::info!("App list changed on disk, reloaded"),
        Ok(false) => {}
        Err(e) => tracing::warn!("Failed to reload app list: {}", e),
    }

    if let Err(e) = state.tracker.scan() {
        tracing::debug!("Background scan failed: {}", e);
    }

    let purged = state.sessions.purge_expired();
    if purged > 0 {
        tracing::info!("Purged {} expired sessions", purged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::table::testing::FakeTable;
    use av_core::config::ServerConfig;
    use av_core::icons::NoIcons;
    use av_core::store::{AppStore, JsonStore};
    use av_core::types::{AppId, AppRecord};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_monitor_reloads_and_scans_until_cancelled() {
        let dir = TempDir::new().unwrap();
        let table = Arc::new(FakeTable::default());
        table.set(&["game"]);
        let state = Arc::new(
            ServerState::with_parts(
                ServerConfig::default(),
                Arc::new(JsonStore::in_dir(dir.path())),
                Arc::new(NoIcons),
                table.clone(),
            )
            .unwrap(),
        );

        // Another process (the CLI) writes the app list
        JsonStore::in_dir(dir.path())
            .save_apps(&[AppRecord {
                id: AppId::new("game"),
                name: "Game".to_string(),
                path: "/opt/game".to_string(),
                args: String::new(),
                icon: String::new(),
            }])
            .unwrap();

        let cancel = CancellationToken::new();
        let monitor = tokio::spawn(run_monitor(
            Arc::clone(&state),
            Duration::from_millis(10),
            cancel.clone(),
        ));

        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while !state.tracker.get_status(&AppId::new("game")) {
            assert!(tokio::time::Instant::now() < deadline, "monitor never picked up the app");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(state.registry.len(), 1);

        cancel.cancel();
        tokio::time::timeout(Duration::from_secs(5), monitor)
            .await
            .unwrap()
            .unwrap();
    }
}
