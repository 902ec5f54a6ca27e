//! Process lifecycle: launching apps and observing what is running
//!
//! Two independent views share the registry's watch table:
//! - launch records, flipped to not-running by a per-launch exit waiter
//! - status snapshots, produced by full process table scans and swapped in
//!   wholesale

mod cache;
mod launch;
mod monitor;
mod table;
mod tracker;

pub use cache::{StatusCache, FRESHNESS_WINDOW};
pub use launch::{spawn_detached, split_args};
pub use monitor::run_monitor;
pub use table::{ProcessTable, SystemProcessTable};
pub use tracker::{LaunchRecord, ProcessTracker, StatusSnapshot};
