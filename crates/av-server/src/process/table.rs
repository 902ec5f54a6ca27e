//! OS process table access

use std::collections::HashSet;
use std::ffi::OsStr;

use parking_lot::Mutex;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};

use av_core::error::ScanError;

/// Enumerates the image names of all live processes
pub trait ProcessTable: Send + Sync {
    /// Lowercased image filenames of every live process, enumerated once
    fn image_names(&self) -> Result<HashSet<String>, ScanError>;
}

/// Process table backed by `sysinfo`
pub struct SystemProcessTable {
    system: Mutex<System>,
}

impl SystemProcessTable {
    /// Create a table with an empty process cache
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
        }
    }
}

impl Default for SystemProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for SystemProcessTable {
    fn image_names(&self) -> Result<HashSet<String>, ScanError> {
        let mut system = self.system.lock();
        system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::new().with_exe(UpdateKind::OnlyIfNotSet),
        );

        // At the very least this process must be visible
        if system.processes().is_empty() {
            return Err(ScanError("process table enumeration returned nothing".to_string()));
        }

        let mut names = HashSet::with_capacity(system.processes().len());
        for process in system.processes().values() {
            names.insert(lowercase(process.name()));
            // Kernel-reported names can be truncated; the exe basename is not
            if let Some(file) = process.exe().and_then(|exe| exe.file_name()) {
                names.insert(lowercase(file));
            }
        }
        Ok(names)
    }
}

fn lowercase(name: impl AsRef<OsStr>) -> String {
    name.as_ref().to_string_lossy().to_lowercase()
}
