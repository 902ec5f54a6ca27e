//! Detached process creation

use std::path::Path;
use std::process::{Child, Command, Stdio};

use av_core::error::LaunchError;

/// Split an argument string on whitespace.
///
/// Quoting is deliberately not interpreted: `"My Documents"` becomes the two
/// arguments `"My` and `Documents"`.
pub fn split_args(args: &str) -> Vec<String> {
    args.split_whitespace().map(str::to_string).collect()
}

/// Start `path` detached from this service
///
/// The child gets null stdio, runs in the executable's directory and is
/// placed in its own process group so it outlives the service and does not
/// receive its terminal signals.
pub fn spawn_detached(path: &str, args: &str) -> Result<Child, LaunchError> {
    let exe = Path::new(path);
    if !exe.exists() {
        return Err(LaunchError::Failed(format!("executable not found: {}", path)));
    }

    let mut command = Command::new(exe);
    command
        .args(split_args(args))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    if let Some(dir) = exe.parent().filter(|d| !d.as_os_str().is_empty()) {
        command.current_dir(dir);
    }

    detach(&mut command);

    command
        .spawn()
        .map_err(|e| LaunchError::Failed(format!("failed to start {}: {}", path, e)))
}

#[cfg(unix)]
fn detach(command: &mut Command) {
    use std::os::unix::process::CommandExt;
    command.process_group(0);
}

#[cfg(windows)]
fn detach(command: &mut Command) {
    use std::os::windows::process::CommandExt;
    use windows_sys::Win32::System::Threading::{CREATE_NEW_PROCESS_GROUP, DETACHED_PROCESS};
    command.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
}

#[cfg(not(any(unix, windows)))]
fn detach(_command: &mut Command) {}
