//! CLI command implementations

mod apps;
mod config;
mod serve;
mod settings;

pub use apps::{apps_add, apps_list, apps_remove, apps_update, open_registry};
pub use config::{config_init, config_show};
pub use serve::serve_command;
pub use settings::{settings_set, settings_show};
