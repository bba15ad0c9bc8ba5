//! Project document types.
//!
//! This module defines the serde structures that map to a *normalized* project
//! document (see [`crate::normalize`]). Every field is optional here; defaults
//! and validation are applied by [`crate::loader`].
//!
//! # Config Format
//!
//! ```toml
//! name = "blog"
//! root = "~/src/blog"
//! pre_window = ["nvm use"]
//!
//! [options]
//! status-position = "top"
//!
//! [[windows]]
//! name = "editor"
//! layout = "main-vertical"
//! panes = ["vim", "guard"]
//!
//! [[windows]]
//! name = "server"
//! commands = ["npm start"]
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Pane arrangement applied with `select-layout`.
///
/// Maps to tmux's built-in layout algorithms. Any other string (for example a
/// layout description copied from `tmux list-windows`) is kept verbatim as
/// [`Layout::Custom`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Layout {
    /// Spread panes evenly (tmux: "tiled").
    Tiled,
    /// Side-by-side panes (tmux: "even-horizontal").
    EvenHorizontal,
    /// Stacked panes (tmux: "even-vertical").
    EvenVertical,
    /// One large pane on top, the rest below (tmux: "main-horizontal").
    MainHorizontal,
    /// One large pane on the left, the rest beside it (tmux: "main-vertical").
    MainVertical,
    /// A layout string passed through to tmux unchanged.
    Custom(String),
}

impl Layout {
    /// Convert to the tmux layout name used by `select-layout`.
    pub fn to_tmux_layout(&self) -> &str {
        match self {
            Layout::Tiled => "tiled",
            Layout::EvenHorizontal => "even-horizontal",
            Layout::EvenVertical => "even-vertical",
            Layout::MainHorizontal => "main-horizontal",
            Layout::MainVertical => "main-vertical",
            Layout::Custom(layout) => layout,
        }
    }
}

impl From<String> for Layout {
    fn from(name: String) -> Self {
        match name.as_str() {
            "tiled" => Layout::Tiled,
            // Short aliases describe how the panes end up, not tmux's axis.
            "even-horizontal" | "vertical" => Layout::EvenHorizontal,
            "even-vertical" | "horizontal" => Layout::EvenVertical,
            "main-horizontal" => Layout::MainHorizontal,
            "main-vertical" => Layout::MainVertical,
            _ => Layout::Custom(name),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_tmux_layout())
    }
}

/// A pane as written in a normalized document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaneDoc {
    /// Commands typed into the pane, in order.
    #[serde(default)]
    pub commands: Vec<String>,
    /// Working directory override.
    #[serde(default)]
    pub root: Option<PathBuf>,
}

/// A window as written in a normalized document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WindowDoc {
    /// Optional tmux window name.
    #[serde(default)]
    pub name: Option<String>,
    /// Layout applied once all panes exist.
    #[serde(default)]
    pub layout: Option<Layout>,
    /// Working directory override for the window and its panes.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// Replaces the session's `pre_window` for this window.
    #[serde(default)]
    pub pre: Option<Vec<String>>,
    /// Commands for the implicit single pane of a window without `panes`.
    #[serde(default)]
    pub commands: Option<Vec<String>>,
    /// Explicit panes, in index order.
    #[serde(default)]
    pub panes: Option<Vec<PaneDoc>>,
}

/// Top-level project document, after normalization and layer merging.
///
/// Unknown keys are ignored so newer project files still load.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectDoc {
    /// Session name.
    #[serde(default)]
    pub name: Option<String>,
    /// Default working directory for every window and pane.
    #[serde(default)]
    pub root: Option<PathBuf>,
    /// tmux server socket name (`-L`).
    #[serde(default)]
    pub socket_name: Option<String>,
    /// tmux server socket path (`-S`).
    #[serde(default)]
    pub socket_path: Option<PathBuf>,
    /// Shell commands run once before the session is created.
    #[serde(default)]
    pub pre: Vec<String>,
    /// Commands typed into every pane before its own commands.
    #[serde(default)]
    pub pre_window: Vec<String>,
    /// Shell commands run once after the session is built.
    #[serde(default)]
    pub startup: Vec<String>,
    /// tmux session options.
    #[serde(default)]
    pub options: BTreeMap<String, String>,
    /// Windows, in index order.
    #[serde(default)]
    pub windows: Vec<WindowDoc>,
    /// Attach to the session once it exists.
    #[serde(default)]
    pub attach: Option<bool>,
    /// tmux binary or wrapper to invoke.
    #[serde(default)]
    pub tmux_command: Option<String>,
    /// Extra arguments passed to every tmux invocation.
    #[serde(default)]
    pub tmux_options: Option<String>,
    /// Window (name or index) focused before attaching.
    #[serde(default)]
    pub startup_window: Option<String>,
    /// Pane index focused within the startup window.
    #[serde(default)]
    pub startup_pane: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_aliases() {
        assert_eq!(Layout::from("vertical".to_string()), Layout::EvenHorizontal);
        assert_eq!(Layout::from("horizontal".to_string()), Layout::EvenVertical);
        assert_eq!(
            Layout::from("main-vertical".to_string()).to_tmux_layout(),
            "main-vertical"
        );
    }

    #[test]
    fn test_custom_layout_kept_verbatim() {
        let raw = "bb62,159x48,0,0{79x48,0,0,79x48,80,0}";
        assert_eq!(Layout::from(raw.to_string()).to_tmux_layout(), raw);
    }

    #[test]
    fn test_project_doc_ignores_unknown_keys() {
        let doc: ProjectDoc = toml::from_str(
            r#"
            name = "demo"
            something_new = true

            [[windows]]
            name = "editor"
            layout = "tiled"
            panes = [{ commands = ["vim"], root = "/src" }]
            "#,
        )
        .unwrap();
        assert_eq!(doc.name.as_deref(), Some("demo"));
        assert_eq!(doc.windows[0].layout, Some(Layout::Tiled));
        let panes = doc.windows[0].panes.as_ref().unwrap();
        assert_eq!(panes[0].commands, vec!["vim"]);
        assert_eq!(panes[0].root, Some(PathBuf::from("/src")));
    }
}
