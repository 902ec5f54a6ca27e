//! Config command implementations

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use av_core::config::{self, ServerConfig};

use crate::output::{print_error, print_info, print_success, print_warning};

/// Print the effective configuration as TOML
pub fn config_show(config_path: Option<&Path>) -> Result<()> {
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config::default_config_path);

    if path.exists() {
        print_info(&format!("Configuration file: {:?}", path));
    } else {
        print_warning(&format!("No configuration file found at {:?}, showing defaults", path));
        print_info("Run 'aviator config init' to create one");
    }
    println!();

    let effective = if path.exists() {
        config::load_config::<ServerConfig>(&path)
            .with_context(|| format!("Failed to load config from {:?}", path))?
    } else {
        ServerConfig::default()
    };

    println!("{}", toml::to_string_pretty(&effective)?);
    Ok(())
}

/// Write a default configuration file
///
/// The data directory defaults to the directory holding the config file.
pub fn config_init(config_path: Option<&Path>, force: bool) -> Result<()> {
    let config_file = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config::default_config_path);
    let config_dir = config_file
        .parent()
        .map(PathBuf::from)
        .unwrap_or_else(config::default_config_dir);

    if config_file.exists() && !force {
        print_error(&format!("Config file already exists: {:?}", config_file));
        print_info("Use --force to overwrite");
        return Ok(());
    }

    let defaults = ServerConfig {
        data_dir: config_dir,
        ..ServerConfig::default()
    };
    config::save_config(&config_file, &defaults)
        .with_context(|| format!("Failed to write config file: {:?}", config_file))?;

    print_success(&format!("Created configuration file: {:?}", config_file));
    if defaults.auth.pin.is_none() {
        print_info("No PIN set; anyone on the network can launch apps");
        print_info("Set auth.pin in the config file to require one");
    }
    Ok(())
}
