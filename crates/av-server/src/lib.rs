//! av-server: LAN launcher service
//!
//! Keeps the registry of launchable apps, authenticates clients with a
//! shared PIN, launches apps detached from the service and reports which
//! registered apps are currently running, all over a small HTTP API.

pub mod auth;
pub mod daemon;
pub mod discovery;
pub mod gateway;
pub mod process;
pub mod registry;
pub mod state;

pub use gateway::Gateway;
pub use state::ServerState;
