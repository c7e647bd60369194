//! Opening the output folder in the platform file browser.

use anyhow::Context;
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};

/// Program used to open folders on this platform.
pub fn file_browser() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        "explorer"
    }
    #[cfg(target_os = "macos")]
    {
        "open"
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        "xdg-open"
    }
}

/// Open `dir` in the platform file browser without waiting for it.
///
/// # Errors
///
/// Returns an error if the browser program cannot be started.
pub fn open_folder(dir: &Path) -> crate::Result<()> {
    open_with(OsStr::new(file_browser()), dir)
}

fn open_with(program: &OsStr, dir: &Path) -> crate::Result<()> {
    tracing::debug!(program = ?program, dir = %dir.display(), "Opening output folder");

    Command::new(program)
        .arg(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("open folder failed: {}", dir.display()))?;

    Ok(())
}
