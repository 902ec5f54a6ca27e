//! av-core: Core abstractions and configuration for Aviator
//!
//! This crate provides the shared domain types, error taxonomy, configuration
//! and the collaborators (persistence, icons, auto-start) used by the server
//! and the CLI.

pub mod autostart;
pub mod config;
pub mod error;
pub mod icons;
pub mod settings;
pub mod store;
pub mod types;

pub use error::AvError;
pub use types::{AppId, AppRecord, Settings};
