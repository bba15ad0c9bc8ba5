//! Compiling a [`Specification`] into a shell script.
//!
//! The script is a sequence of POSIX shell lines that drive tmux. Rendering
//! is pure: nothing is executed and the same specification always produces
//! byte-identical output.
//!
//! # Script shape
//!
//! ```text
//! if ! tmux has-session -t =demo 2>/dev/null; then
//!   <pre commands>
//!   TMUX= tmux new-session -d -s demo -n editor -c /tmp
//!   tmux send-keys -t demo:0.0 vim C-m
//!   tmux new-window -t demo:1 -n server -c /tmp
//!   tmux send-keys -t demo:1.0 'npm start' C-m
//!   <options, startup commands>
//!   tmux select-window -t =demo:0
//!   tmux select-pane -t =demo:0.0
//! fi
//! if [ -z "$TMUX" ]; then tmux -u attach-session -t =demo; else tmux -u switch-client -t =demo; fi
//! ```
//!
//! Everything that builds the session sits inside the `has-session` guard, so
//! running the script against a live session only attaches to it. Lookups of
//! an existing session use tmux's `=name` form, which matches the name exactly
//! instead of falling back to prefix or pattern matching.
//!
//! # Pane splits
//!
//! Each extra pane is created with tmux's default split of the most recent
//! pane and the window is immediately rebalanced with `select-layout tiled`,
//! so any number of panes fits. A declared layout is applied once every pane
//! of the window exists.

use crate::model::{self, Pane, Socket, Specification, Window};
use crate::quote::{quote, quote_path};
use std::fmt;
use std::path::Path;
use tracing::debug;

const INDENT: &str = "  ";

/// Layout used to keep room for the next split.
const REBALANCE_LAYOUT: &str = "tiled";

/// `send-keys` key that submits the typed command.
const ENTER: &str = "C-m";

/// Rendered shell script, one command per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    lines: Vec<String>,
}

impl Script {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Builds tmux invocations with the session's binary, socket, and options.
struct Tmux {
    prefix: String,
}

impl Tmux {
    fn new(spec: &Specification) -> Self {
        let mut prefix = spec.tmux_command().to_string();
        match spec.socket() {
            Some(Socket::Name(name)) => {
                prefix.push_str(" -L ");
                prefix.push_str(&quote(name));
            }
            Some(Socket::Path(path)) => {
                prefix.push_str(" -S ");
                prefix.push_str(&quote_path(path));
            }
            None => {}
        }
        // Raw arguments, e.g. `-f ~/.tmux.alt.conf`.
        if let Some(options) = spec.tmux_options() {
            prefix.push(' ');
            prefix.push_str(options);
        }
        Tmux { prefix }
    }

    fn command(&self, subcommand: &str) -> Invocation {
        Invocation {
            words: vec![self.prefix.clone(), subcommand.to_string()],
        }
    }
}

/// One tmux command line under construction.
struct Invocation {
    words: Vec<String>,
}

impl Invocation {
    fn arg(mut self, word: &str) -> Self {
        self.words.push(quote(word));
        self
    }

    fn opt(self, flag: &str, value: &str) -> Self {
        self.arg(flag).arg(value)
    }

    fn name(self, name: Option<&str>) -> Self {
        match name {
            Some(name) => self.opt("-n", name),
            None => self,
        }
    }

    /// `-c <root>`, omitted when tmux should inherit the current directory.
    fn root(mut self, root: Option<&Path>) -> Self {
        if let Some(root) = root {
            self.words.push("-c".to_string());
            self.words.push(quote_path(root));
        }
        self
    }

    fn finish(self) -> String {
        self.words.join(" ")
    }
}

/// Render the script that creates `spec`'s session.
pub fn render(spec: &Specification) -> Script {
    let tmux = Tmux::new(spec);
    let session = spec.name();
    let exact = exact_target(session);
    let mut body = Vec::new();

    body.extend(spec.pre().iter().cloned());

    if spec.windows().is_empty() {
        body.push(new_session(&tmux, session, None, spec.root()));
    }
    for (index, window) in spec.windows().iter().enumerate() {
        render_window(&mut body, &tmux, spec, index, window);
    }

    for (option, value) in spec.options() {
        body.push(
            tmux.command("set-option")
                .opt("-t", session)
                .arg(option)
                .arg(value)
                .finish(),
        );
    }

    body.extend(spec.startup().iter().cloned());

    if !spec.windows().is_empty() {
        let window = spec.startup_window();
        body.push(
            tmux.command("select-window")
                .opt("-t", &format!("{exact}:{window}"))
                .finish(),
        );
        body.push(
            tmux.command("select-pane")
                .opt("-t", &format!("{exact}:{window}.{}", spec.startup_pane()))
                .finish(),
        );
    }

    let mut lines = Vec::with_capacity(body.len() + 3);
    lines.push(format!(
        "if ! {} 2>/dev/null; then",
        tmux.command("has-session").opt("-t", &exact).finish()
    ));
    lines.extend(body.into_iter().map(|line| format!("{INDENT}{line}")));
    lines.push("fi".to_string());

    if spec.attach() {
        lines.push(format!(
            "if [ -z \"$TMUX\" ]; then {}; else {}; fi",
            tmux.command("-u attach-session").opt("-t", &exact).finish(),
            tmux.command("-u switch-client").opt("-t", &exact).finish(),
        ));
    }

    debug!(session, lines = lines.len(), "rendered script");
    Script { lines }
}

/// Session target that only matches a session named exactly `session`.
fn exact_target(session: &str) -> String {
    format!("={session}")
}

/// Keys typed for `command`. tmux reads a trailing `;` as a command
/// separator, so it is escaped to reach the pane literally.
fn keys(command: &str) -> String {
    match command.strip_suffix(';') {
        Some(rest) if !rest.ends_with('\\') => format!("{rest}\\;"),
        _ => command.to_string(),
    }
}

/// `new-session` also creates window 0, so it carries that window's name and root.
fn new_session(tmux: &Tmux, session: &str, name: Option<&str>, root: Option<&Path>) -> String {
    // Clearing TMUX lets the session be created from inside another session.
    format!(
        "TMUX= {}",
        tmux.command("new-session")
            .arg("-d")
            .opt("-s", session)
            .name(name)
            .root(root)
            .finish()
    )
}

fn render_window(
    body: &mut Vec<String>,
    tmux: &Tmux,
    spec: &Specification,
    index: usize,
    window: &Window,
) {
    let session = spec.name();
    let target = format!("{session}:{index}");

    let first_root = pane_root(spec, window, &window.panes()[0]);
    if index == 0 {
        body.push(new_session(tmux, session, window.name(), first_root));
    } else {
        body.push(
            tmux.command("new-window")
                .opt("-t", &target)
                .name(window.name())
                .root(first_root)
                .finish(),
        );
    }

    for pane in &window.panes()[1..] {
        body.push(
            tmux.command("split-window")
                .opt("-t", &target)
                .root(pane_root(spec, window, pane))
                .finish(),
        );
        body.push(
            tmux.command("select-layout")
                .opt("-t", &target)
                .arg(REBALANCE_LAYOUT)
                .finish(),
        );
    }

    let pre = model::effective_pre(window.pre(), spec.pre_window());
    for (pane_index, pane) in window.panes().iter().enumerate() {
        let pane_target = format!("{target}.{pane_index}");
        for command in pre.iter().chain(pane.commands()) {
            body.push(
                tmux.command("send-keys")
                    .opt("-t", &pane_target)
                    .arg(&keys(command))
                    .arg(ENTER)
                    .finish(),
            );
        }
    }

    if let Some(layout) = window.layout() {
        body.push(
            tmux.command("select-layout")
                .opt("-t", &target)
                .arg(layout.to_tmux_layout())
                .finish(),
        );
    }
}

fn pane_root<'a>(spec: &'a Specification, window: &'a Window, pane: &'a Pane) -> Option<&'a Path> {
    model::resolve_root(pane.root(), window.root(), spec.root())
}
