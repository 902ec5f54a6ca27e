//! av-cli: Command-line interface for Aviator
//!
//! Provides the `aviator` binary: runs the launcher service and manages the
//! registered apps, settings and configuration on this machine.

pub mod commands;
pub mod output;
