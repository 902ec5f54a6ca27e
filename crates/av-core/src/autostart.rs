//! Auto-start collaborator
//!
//! On freedesktop systems auto-start is a `.desktop` entry in
//! `$XDG_CONFIG_HOME/autostart`. Other platforms report
//! [`AutoStartError::Unsupported`] through [`Unsupported`].

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::AutoStartError;

/// Desktop entry file name
const ENTRY_NAME: &str = "aviator.desktop";

/// Registers the service to start with the user session
pub trait AutoStart: Send + Sync {
    /// Whether the registration currently exists
    fn is_enabled(&self) -> bool;

    /// Create or remove the registration
    fn set_enabled(&self, enabled: bool) -> Result<(), AutoStartError>;
}

/// XDG autostart desktop entry
#[derive(Debug, Clone)]
pub struct XdgAutoStart {
    autostart_dir: PathBuf,
    exec: PathBuf,
}

impl XdgAutoStart {
    /// Entry in `autostart_dir` that runs `exec`
    pub fn new(autostart_dir: impl Into<PathBuf>, exec: impl Into<PathBuf>) -> Self {
        Self {
            autostart_dir: autostart_dir.into(),
            exec: exec.into(),
        }
    }

    /// Entry in the user's autostart directory for the current executable
    pub fn for_current_exe() -> io::Result<Self> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "Could not find config directory")
        })?;
        Ok(Self::new(config_dir.join("autostart"), std::env::current_exe()?))
    }

    fn entry_path(&self) -> PathBuf {
        self.autostart_dir.join(ENTRY_NAME)
    }

    fn entry_contents(&self) -> String {
        format!(
            "[Desktop Entry]\nType=Application\nName=Aviator\nExec=\"{}\" serve\nX-GNOME-Autostart-enabled=true\n",
            self.exec.display()
        )
    }
}

impl AutoStart for XdgAutoStart {
    fn is_enabled(&self) -> bool {
        self.entry_path().is_file()
    }

    fn set_enabled(&self, enabled: bool) -> Result<(), AutoStartError> {
        let path = self.entry_path();
        if enabled {
            fs::create_dir_all(&self.autostart_dir)?;
            fs::write(&path, self.entry_contents())?;
            tracing::info!("Registered auto-start entry at {:?}", path);
            return Ok(());
        }

        match fs::remove_file(&path) {
            Ok(()) => {
                tracing::info!("Removed auto-start entry {:?}", path);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Platforms without a supported mechanism
#[derive(Debug, Default, Clone, Copy)]
pub struct Unsupported;

impl AutoStart for Unsupported {
    fn is_enabled(&self) -> bool {
        false
    }

    fn set_enabled(&self, enabled: bool) -> Result<(), AutoStartError> {
        if enabled {
            Err(AutoStartError::Unsupported)
        } else {
            Ok(())
        }
    }
}

/// The auto-start mechanism for the running platform
pub fn platform_default() -> Box<dyn AutoStart> {
    if cfg!(all(unix, not(target_os = "macos"))) {
        match XdgAutoStart::for_current_exe() {
            Ok(xdg) => return Box::new(xdg),
            Err(e) => tracing::warn!("Auto-start unavailable: {}", e),
        }
    }
    Box::new(Unsupported)
}
