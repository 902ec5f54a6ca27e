//! Settings commands

use std::sync::Arc;

use anyhow::{Context, Result};

use av_core::autostart;
use av_core::config::ServerConfig;
use av_core::settings::SettingsService;
use av_core::store::JsonStore;
use av_core::types::Settings;

use crate::output::{format_settings, print_success};

fn open_settings(config: &ServerConfig) -> SettingsService {
    let store = Arc::new(JsonStore::new(config.apps_path(), config.settings_path()));
    SettingsService::load(store, Arc::from(autostart::platform_default()))
}

/// Print the effective settings
pub fn settings_show(config: &ServerConfig) -> Result<()> {
    let service = open_settings(config);
    print!("{}", format_settings(&service.get()));
    Ok(())
}

/// Change settings; `None` keeps the current value
pub fn settings_set(config: &ServerConfig, auto_start: Option<bool>) -> Result<()> {
    let service = open_settings(config);
    let current = service.get();
    let next = Settings {
        auto_start: auto_start.unwrap_or(current.auto_start),
    };

    service.update(next).context("Failed to apply settings")?;
    print_success("Settings updated");
    print!("{}", format_settings(&service.get()));
    Ok(())
}
