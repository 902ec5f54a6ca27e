//! Icon derivation collaborator
//!
//! Extracting embedded resources from executables is platform specific, so
//! the registry only depends on [`IconSource`]. The bundled
//! [`SidecarIcons`] looks for an image next to the executable sharing its
//! stem (`game.exe` -> `game.png` / `game.ico`).

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::IconError;

/// Image extensions probed by [`SidecarIcons`], in order
const SIDECAR_EXTENSIONS: &[&str] = &["png", "ico"];

/// Derives a base64 icon payload for an executable
pub trait IconSource: Send + Sync {
    /// Return the icon for `executable` as a base64 blob
    fn derive_icon(&self, executable: &str) -> Result<String, IconError>;
}

/// Icon source that never finds anything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIcons;

impl IconSource for NoIcons {
    fn derive_icon(&self, executable: &str) -> Result<String, IconError> {
        Err(IconError::NotFound(executable.to_string()))
    }
}

/// Reads `<stem>.png` or `<stem>.ico` from the executable's directory
#[derive(Debug, Default, Clone, Copy)]
pub struct SidecarIcons;

impl IconSource for SidecarIcons {
    fn derive_icon(&self, executable: &str) -> Result<String, IconError> {
        let path = Path::new(executable);
        for ext in SIDECAR_EXTENSIONS {
            let candidate = path.with_extension(ext);
            if candidate.is_file() {
                let bytes = std::fs::read(&candidate)?;
                return Ok(STANDARD.encode(bytes));
            }
        }
        Err(IconError::NotFound(executable.to_string()))
    }
}
