//! App registry commands
//!
//! These edit the persisted app list directly. A running service notices
//! the file change on its next monitor tick and reloads.

use std::sync::Arc;

use anyhow::{Context, Result};

use av_core::config::ServerConfig;
use av_core::icons::SidecarIcons;
use av_core::store::JsonStore;
use av_core::types::AppId;
use av_server::registry::AppRegistry;

use crate::output::{format_apps, print_success};

/// Open the registry stored under the configured data directory
pub fn open_registry(config: &ServerConfig) -> Result<AppRegistry> {
    let store = Arc::new(JsonStore::new(config.apps_path(), config.settings_path()));
    AppRegistry::load(store, Arc::new(SidecarIcons))
        .with_context(|| format!("Failed to load apps from {:?}", config.apps_path()))
}

/// Print the registered apps
pub fn apps_list(config: &ServerConfig, long: bool) -> Result<()> {
    let registry = open_registry(config)?;
    println!("{}", format_apps(&registry.list(), long));
    Ok(())
}

/// Register a new app
pub fn apps_add(config: &ServerConfig, name: &str, path: &str, args: &str) -> Result<()> {
    let registry = open_registry(config)?;
    let app = registry.add(name, path, args);
    registry.flush().context("Failed to save app list")?;

    print_success(&format!("Registered {} ({})", app.name, app.id));
    if !std::path::Path::new(path).exists() {
        crate::output::print_warning(&format!("{} does not exist yet; launches will fail", path));
    }
    Ok(())
}

/// Change an app; fields left as `None` keep their current value
pub fn apps_update(
    config: &ServerConfig,
    id: &str,
    name: Option<&str>,
    path: Option<&str>,
    args: Option<&str>,
) -> Result<()> {
    let registry = open_registry(config)?;
    let id = AppId::new(id);
    let current = registry
        .get(&id)
        .with_context(|| format!("App not found: {}", id))?;

    let updated = registry.update(
        &id,
        name.unwrap_or(&current.name),
        path.unwrap_or(&current.path),
        args.unwrap_or(&current.args),
    );
    if !updated {
        anyhow::bail!("App not found: {}", id);
    }
    registry.flush().context("Failed to save app list")?;

    print_success(&format!("Updated {}", id));
    Ok(())
}

/// Remove an app. Removing an unknown ID only prints a notice.
pub fn apps_remove(config: &ServerConfig, id: &str) -> Result<()> {
    let registry = open_registry(config)?;
    let id = AppId::new(id);

    if registry.get(&id).is_none() {
        crate::output::print_info(&format!("No app with ID {}", id));
        return Ok(());
    }

    registry.remove(&id);
    registry.flush().context("Failed to save app list")?;
    print_success(&format!("Removed {}", id));
    Ok(())
}
