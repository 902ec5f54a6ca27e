//! Aviator CLI
//!
//! Single binary for the launcher:
//! - Service (serves the API and web client on the LAN)
//! - Management commands (apps, settings, config)

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use av_core::config::{self, ServerConfig};
use aviator::commands;
use aviator::output::print_error;

#[derive(Parser)]
#[command(name = "aviator")]
#[command(author, version, about = "Launch apps on this machine from any device on the LAN")]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the launcher service
    /// Alias: start
    #[command(alias = "start")]
    Serve {
        /// Bind address (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Manage registered apps
    Apps {
        #[command(subcommand)]
        action: AppsAction,
    },

    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum AppsAction {
    /// List registered apps
    List {
        /// Show arguments and icon state
        #[arg(short, long)]
        long: bool,
    },
    /// Register an app
    Add {
        /// Display name
        name: String,
        /// Path to the executable
        path: String,
        /// Arguments, split on whitespace at launch
        #[arg(short, long, default_value = "", allow_hyphen_values = true)]
        args: String,
    },
    /// Change a registered app
    Update {
        /// App ID
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        path: Option<String>,
        #[arg(short, long, allow_hyphen_values = true)]
        args: Option<String>,
    },
    /// Remove a registered app
    #[command(alias = "rm")]
    Remove {
        /// App ID
        id: String,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Show current settings
    Show,
    /// Change settings
    Set {
        /// Start the service on login
        #[arg(long)]
        auto_start: Option<bool>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    // The service logs its lifecycle at info
    let log_level = match (&cli.command, cli.verbose) {
        (Commands::Serve { .. }, 0) if !cli.quiet => "info",
        _ => log_level,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = run(cli.command, cli.config.as_deref()).await {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: Commands, config_path: Option<&Path>) -> Result<()> {
    match command {
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_show(config_path),
            ConfigAction::Init { force } => commands::config_init(config_path, force),
        },
        Commands::Serve { bind } => {
            let config = load_config(config_path)?;
            commands::serve_command(config, bind).await
        }
        Commands::Apps { action } => {
            let config = load_config(config_path)?;
            match action {
                AppsAction::List { long } => commands::apps_list(&config, long),
                AppsAction::Add { name, path, args } => {
                    commands::apps_add(&config, &name, &path, &args)
                }
                AppsAction::Update {
                    id,
                    name,
                    path,
                    args,
                } => commands::apps_update(
                    &config,
                    &id,
                    name.as_deref(),
                    path.as_deref(),
                    args.as_deref(),
                ),
                AppsAction::Remove { id } => commands::apps_remove(&config, &id),
            }
        }
        Commands::Settings { action } => {
            let config = load_config(config_path)?;
            match action {
                SettingsAction::Show => commands::settings_show(&config),
                SettingsAction::Set { auto_start } => commands::settings_set(&config, auto_start),
            }
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ServerConfig> {
    config::load_or_default(path).with_context(|| match path {
        Some(path) => format!("Failed to load config from {:?}", path),
        None => "Failed to load config".to_string(),
    })
}
