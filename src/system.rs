//! Environment probing and process hand-off.
//!
//! Everything here touches the outside world: checking for tmux, `$EDITOR`
//! and `$SHELL`, opening project files, and running a rendered script.

use crate::error::{Result, TmuxupError};
use crate::render::Script;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::debug;

/// Check whether `tmux_command` runs (`tmux -V` succeeds).
pub fn tmux_installed(tmux_command: &str) -> bool {
    Command::new(tmux_command)
        .arg("-V")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// The user's editor, if `$EDITOR` is set and non-empty.
pub fn editor() -> Option<String> {
    non_empty_var("EDITOR")
}

/// The user's shell, if `$SHELL` is set and non-empty.
pub fn shell() -> Option<String> {
    non_empty_var("SHELL")
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Open `path` in `$EDITOR` and wait for it to exit.
///
/// The editor value is run through `sh` so settings like `code --wait` work.
pub fn open_in_editor(path: &Path) -> Result<()> {
    let editor = editor().ok_or_else(|| TmuxupError::EditorError("$EDITOR is not set".into()))?;
    debug!(editor = %editor, path = %path.display(), "opening editor");

    let status = Command::new("sh")
        .arg("-c")
        .arg(format!("{editor} \"$1\""))
        .arg("sh")
        .arg(path)
        .status()
        .map_err(|e| TmuxupError::EditorError(e.to_string()))?;

    if !status.success() {
        return Err(TmuxupError::EditorError(format!(
            "{editor} exited with {status}"
        )));
    }
    Ok(())
}

/// Run a rendered script with `sh`, inheriting the terminal.
pub fn run_script(script: &Script) -> Result<()> {
    debug!(lines = script.lines().len(), "running script");
    let status = Command::new("sh")
        .arg("-c")
        .arg(script.to_string())
        .status()
        .map_err(|e| TmuxupError::ScriptError(e.to_string()))?;

    if !status.success() {
        return Err(TmuxupError::ScriptError(format!("script exited with {status}")));
    }
    Ok(())
}
