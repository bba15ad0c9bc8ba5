//! The in-memory session model.
//!
//! A [`Specification`] is built by [`crate::loader::load`] and never mutated
//! afterwards; the renderer only reads it. Fields are private so that the
//! invariants checked by the loader (valid session name, at least one pane per
//! window, in-range startup target) hold for every value of these types.
//!
//! Inherited settings are not copied down the hierarchy. [`resolve_root`] and
//! [`effective_pre`] compute them on demand from the three scopes.

use crate::config::Layout;
use crate::error::{Result, TmuxupError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Characters that cannot appear in a tmux session name.
///
/// `.` and `:` separate the session, window, and pane parts of a tmux target.
const RESERVED_NAME_CHARS: &[char] = &['.', ':'];

/// Which tmux server the session lives on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Socket {
    /// Named socket in tmux's default directory (`-L`).
    Name(String),
    /// Explicit socket path (`-S`).
    Path(PathBuf),
}

/// A single pane.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pane {
    pub(crate) commands: Vec<String>,
    pub(crate) root: Option<PathBuf>,
}

impl Pane {
    /// Commands typed into the pane, in order.
    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Working directory override.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }
}

/// A window and its panes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Window {
    pub(crate) name: Option<String>,
    pub(crate) layout: Option<Layout>,
    pub(crate) root: Option<PathBuf>,
    pub(crate) pre: Option<Vec<String>>,
    pub(crate) panes: Vec<Pane>,
}

impl Window {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Window-level pre-commands, if the window overrides `pre_window`.
    pub fn pre(&self) -> Option<&[String]> {
        self.pre.as_deref()
    }

    /// Panes in index order. Never empty.
    pub fn panes(&self) -> &[Pane] {
        &self.panes
    }
}

/// A complete, validated session description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specification {
    pub(crate) name: String,
    pub(crate) root: Option<PathBuf>,
    pub(crate) socket: Option<Socket>,
    pub(crate) pre: Vec<String>,
    pub(crate) pre_window: Vec<String>,
    pub(crate) startup: Vec<String>,
    pub(crate) options: BTreeMap<String, String>,
    pub(crate) windows: Vec<Window>,
    pub(crate) attach: bool,
    pub(crate) tmux_command: String,
    pub(crate) tmux_options: Option<String>,
    pub(crate) startup_window: usize,
    pub(crate) startup_pane: usize,
}

impl Specification {
    /// tmux session name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn socket(&self) -> Option<&Socket> {
        self.socket.as_ref()
    }

    /// Shell commands run before the session is created.
    pub fn pre(&self) -> &[String] {
        &self.pre
    }

    /// Default pre-commands for windows that do not set their own.
    pub fn pre_window(&self) -> &[String] {
        &self.pre_window
    }

    /// Shell commands run after the session is built.
    pub fn startup(&self) -> &[String] {
        &self.startup
    }

    /// tmux session options, ordered by key.
    pub fn options(&self) -> &BTreeMap<String, String> {
        &self.options
    }

    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    pub fn attach(&self) -> bool {
        self.attach
    }

    pub fn tmux_command(&self) -> &str {
        &self.tmux_command
    }

    pub fn tmux_options(&self) -> Option<&str> {
        self.tmux_options.as_deref()
    }

    /// Index of the window focused before attaching.
    pub fn startup_window(&self) -> usize {
        self.startup_window
    }

    /// Index of the pane focused within the startup window.
    pub fn startup_pane(&self) -> usize {
        self.startup_pane
    }
}

/// Effective working directory for a pane.
///
/// Precedence is pane, then window, then session. `None` means the process
/// current directory.
pub fn resolve_root<'a>(
    pane: Option<&'a Path>,
    window: Option<&'a Path>,
    session: Option<&'a Path>,
) -> Option<&'a Path> {
    pane.or(window).or(session)
}

/// Effective pre-commands for a window: its own list if declared (even when
/// empty), otherwise the session's `pre_window`.
pub fn effective_pre<'a>(window: Option<&'a [String]>, session: &'a [String]) -> &'a [String] {
    window.unwrap_or(session)
}

/// Check a session name against tmux's target syntax.
///
/// Names are rejected rather than rewritten, so the session on screen always
/// has exactly the name written in the project file.
///
/// # Errors
///
/// Returns [`TmuxupError::Validation`] if the name is empty or contains
/// whitespace, `.`, or `:`.
pub fn validate_session_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(TmuxupError::Validation(
            "`name` must not be empty".to_string(),
        ));
    }
    if let Some(c) = name
        .chars()
        .find(|c| c.is_whitespace() || RESERVED_NAME_CHARS.contains(c))
    {
        return Err(TmuxupError::Validation(format!(
            "`name` {name:?} contains {c:?}, which tmux does not allow in session names"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_root_precedence() {
        let a = Path::new("/a");
        let b = Path::new("/b");
        let c = Path::new("/c");

        assert_eq!(resolve_root(None, None, Some(a)), Some(a));
        assert_eq!(resolve_root(Some(b), Some(c), Some(a)), Some(b));
        assert_eq!(resolve_root(None, Some(c), Some(a)), Some(c));
        assert_eq!(resolve_root(None, None, None), None);
    }

    #[test]
    fn test_effective_pre_window_override() {
        let session = vec!["nvm use".to_string()];
        let empty: Vec<String> = Vec::new();

        assert_eq!(effective_pre(None, &session), session.as_slice());
        assert!(effective_pre(Some(empty.as_slice()), &session).is_empty());
    }

    #[test]
    fn test_validate_session_name() {
        assert!(validate_session_name("blog-2").is_ok());
        assert!(validate_session_name("").is_err());
        assert!(validate_session_name("my blog").is_err());
        assert!(validate_session_name("v1.2").is_err());
        assert!(validate_session_name("a:b").is_err());
    }
}
