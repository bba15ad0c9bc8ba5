//! Building a [`Specification`] from documents.
//!
//! [`load`] takes a normalized project document plus zero or more normalized
//! fallback documents and produces a validated [`Specification`].
//!
//! # Merge policy
//!
//! - Every key except `options` is taken whole from the highest-priority
//!   document that defines it. Lists are never concatenated, and `windows` is
//!   never merged with a lower layer's windows.
//! - `options` is merged key by key, higher layers overriding single options.

use crate::config::{PaneDoc, ProjectDoc, WindowDoc};
use crate::error::{Result, TmuxupError};
use crate::model::{self, Pane, Socket, Specification, Window};
use toml::{Table, Value};
use tracing::{debug, trace};

/// Key merged option by option across layers.
const MERGED_TABLE: &str = "options";

const DEFAULT_TMUX_COMMAND: &str = "tmux";

/// Build a [`Specification`] from a normalized document.
///
/// `defaults` are fallback layers ordered from highest to lowest priority.
///
/// # Errors
///
/// - [`TmuxupError::Validation`] if the merged document violates a session
///   invariant (missing name, conflicting sockets, ...)
/// - [`TmuxupError::MalformedConfig`] if a value has the wrong type, which can
///   only happen if a document skipped normalization
pub fn load(document: &Table, defaults: &[Table]) -> Result<Specification> {
    let merged = merge_layers(document, defaults);
    let doc: ProjectDoc = Value::Table(merged)
        .try_into()
        .map_err(|e: toml::de::Error| TmuxupError::malformed("<document>", e.to_string()))?;
    build(doc)
}

/// Fold fallback layers under `document`.
fn merge_layers(document: &Table, defaults: &[Table]) -> Table {
    let mut merged = document.clone();

    for (depth, layer) in defaults.iter().enumerate() {
        for (key, value) in layer {
            if !merged.contains_key(key) {
                trace!(key = %key, layer = depth, "taken from default layer");
                merged.insert(key.clone(), value.clone());
                continue;
            }
            if key != MERGED_TABLE {
                continue;
            }
            if let (Some(Value::Table(options)), Value::Table(fallback)) =
                (merged.get_mut(key), value)
            {
                for (option, option_value) in fallback {
                    if !options.contains_key(option) {
                        options.insert(option.clone(), option_value.clone());
                    }
                }
            }
        }
    }

    merged
}

fn build(doc: ProjectDoc) -> Result<Specification> {
    let name = doc
        .name
        .ok_or_else(|| TmuxupError::Validation("missing required key `name`".to_string()))?;
    model::validate_session_name(&name)?;

    let socket = match (doc.socket_name, doc.socket_path) {
        (Some(_), Some(_)) => {
            return Err(TmuxupError::Validation(
                "`socket_name` and `socket_path` are mutually exclusive, set only one".to_string(),
            ));
        }
        (Some(name), None) => Some(Socket::Name(name)),
        (None, Some(path)) => Some(Socket::Path(path)),
        (None, None) => None,
    };

    let windows = doc
        .windows
        .into_iter()
        .enumerate()
        .map(|(index, window)| build_window(index, window))
        .collect::<Result<Vec<_>>>()?;

    let startup_window = resolve_startup_window(doc.startup_window.as_deref(), &windows)?;
    let startup_pane = doc.startup_pane.unwrap_or(0);
    if let Some(window) = windows.get(startup_window) {
        if startup_pane >= window.panes.len() {
            return Err(TmuxupError::Validation(format!(
                "`startup_pane` {startup_pane} is out of range, window {startup_window} has {} pane(s)",
                window.panes.len()
            )));
        }
    } else if doc.startup_pane.is_some() {
        return Err(TmuxupError::Validation(
            "`startup_pane` is set but no windows are declared".to_string(),
        ));
    }

    debug!(
        session = %name,
        windows = windows.len(),
        options = doc.options.len(),
        "loaded specification"
    );

    Ok(Specification {
        name,
        root: doc.root,
        socket,
        pre: doc.pre,
        pre_window: doc.pre_window,
        startup: doc.startup,
        options: doc.options,
        windows,
        attach: doc.attach.unwrap_or(true),
        tmux_command: doc
            .tmux_command
            .unwrap_or_else(|| DEFAULT_TMUX_COMMAND.to_string()),
        tmux_options: doc.tmux_options,
        startup_window,
        startup_pane,
    })
}

fn build_window(index: usize, window: WindowDoc) -> Result<Window> {
    let panes = match (window.panes, window.commands) {
        (Some(_), Some(_)) => {
            return Err(TmuxupError::Validation(format!(
                "window {index} declares both `panes` and `commands`, move the commands into a pane"
            )));
        }
        (Some(panes), None) if !panes.is_empty() => panes.into_iter().map(build_pane).collect(),
        (_, commands) => vec![Pane {
            commands: commands.unwrap_or_default(),
            root: None,
        }],
    };

    Ok(Window {
        name: window.name,
        layout: window.layout,
        root: window.root,
        pre: window.pre,
        panes,
    })
}

fn build_pane(pane: PaneDoc) -> Pane {
    Pane {
        commands: pane.commands,
        root: pane.root,
    }
}

/// Resolve `startup_window` to an index. A window whose name equals the
/// value wins; otherwise a value that parses as a number is an index.
fn resolve_startup_window(target: Option<&str>, windows: &[Window]) -> Result<usize> {
    let Some(target) = target else {
        return Ok(0);
    };

    let index = windows
        .iter()
        .position(|w| w.name() == Some(target))
        .or_else(|| {
            target
                .parse::<usize>()
                .ok()
                .filter(|index| *index < windows.len())
        });

    index.ok_or_else(|| {
        TmuxupError::Validation(format!(
            "`startup_window` {target:?} does not match any declared window"
        ))
    })
}
