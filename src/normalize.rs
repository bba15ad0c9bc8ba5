//! Schema normalization.
//!
//! Project files written for older releases use key names and value shapes
//! that are still accepted but no longer documented. [`normalize`] rewrites a
//! raw document into the canonical schema so that the loader only ever sees
//! one shape per field, and records a [`Deprecation`] for every legacy
//! construct it rewrote.
//!
//! # Legacy forms
//!
//! | Legacy                          | Canonical                              |
//! |---------------------------------|----------------------------------------|
//! | `project_name`                  | `name`                                 |
//! | `project_root`                  | `root`                                 |
//! | `tabs`                          | `windows`                              |
//! | `pre_tab`                       | `pre_window`                           |
//! | `cli_args`                      | `tmux_options`                         |
//! | `rbenv = "2.1"`                 | `pre_window = ["rbenv shell 2.1"]`     |
//! | `rvm = "2.1"`                   | `pre_window = ["rvm use 2.1"]`         |
//! | `windows = ["ls", "vim"]`       | one window per command string          |
//! | `commands = "vim"`              | `commands = ["vim"]`                   |
//!
//! Keys the normalizer does not know are passed through untouched.

use crate::error::{Result, TmuxupError};
use std::fmt;
use toml::{Table, Value};
use tracing::debug;

/// Legacy top-level keys and the canonical key that replaced them.
const RENAMED_KEYS: &[(&str, &str)] = &[
    ("project_name", "name"),
    ("project_root", "root"),
    ("tabs", "windows"),
    ("pre_tab", "pre_window"),
    ("cli_args", "tmux_options"),
];

/// Ruby version manager keys, folded into `pre_window`.
const VERSION_MANAGERS: &[(&str, &str)] = &[("rbenv", "rbenv shell"), ("rvm", "rvm use")];

/// Top-level keys holding a list of shell commands.
const SESSION_COMMAND_LISTS: &[&str] = &["pre", "pre_window", "startup"];

/// Top-level keys holding a plain string.
const SESSION_STRINGS: &[&str] = &[
    "name",
    "root",
    "socket_name",
    "socket_path",
    "tmux_command",
    "tmux_options",
];

/// A non-fatal diagnostic about a legacy construct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deprecation {
    /// Key path of the legacy construct, e.g. `pre_tab` or `windows[0].commands`.
    pub key: String,
    /// Human-readable explanation including the canonical replacement.
    pub message: String,
}

impl Deprecation {
    fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Deprecation {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Deprecation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Output of [`normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// The document rewritten to canonical keys and shapes.
    pub document: Table,
    /// Deprecations in the order they were encountered.
    pub deprecations: Vec<Deprecation>,
}

/// Rewrite a raw document into the canonical schema.
///
/// Top-level rules are applied in a fixed order (renamed keys, version
/// managers, scalar and list fields, `options`, then `windows` in declaration
/// order), which is also the order of the returned deprecations.
///
/// # Errors
///
/// Returns [`TmuxupError::MalformedConfig`] when a known key holds a value
/// that no schema version can interpret, such as `windows = 3`.
pub fn normalize(raw: &Table) -> Result<Normalized> {
    let mut document = raw.clone();
    let mut deprecations = Vec::new();

    for (old, new) in RENAMED_KEYS {
        rename_key(&mut document, old, new, &mut deprecations);
    }
    for (key, command) in VERSION_MANAGERS {
        fold_version_manager(&mut document, key, command, &mut deprecations)?;
    }

    for key in SESSION_STRINGS {
        rewrite(&mut document, key, key, |value, path| expect_string(value, path))?;
    }
    for key in SESSION_COMMAND_LISTS {
        rewrite(&mut document, key, key, |value, path| {
            command_list(value, path, &mut deprecations)
        })?;
    }
    rewrite(&mut document, "attach", "attach", expect_bool)?;
    rewrite(&mut document, "startup_window", "startup_window", window_ref)?;
    rewrite(&mut document, "startup_pane", "startup_pane", expect_index)?;
    rewrite(&mut document, "options", "options", options)?;
    rewrite(&mut document, "windows", "windows", |value, path| {
        windows(value, path, &mut deprecations)
    })?;

    for deprecation in &deprecations {
        debug!(key = %deprecation.key, "rewrote deprecated construct");
    }

    Ok(Normalized {
        document,
        deprecations,
    })
}

/// Replace the value under `key` (if present) with `f(value)`.
fn rewrite<F>(table: &mut Table, key: &str, path: &str, f: F) -> Result<()>
where
    F: FnOnce(Value, &str) -> Result<Value>,
{
    if let Some(slot) = table.get_mut(key) {
        let value = std::mem::replace(slot, Value::Boolean(false));
        *slot = f(value, path)?;
    }
    Ok(())
}

fn rename_key(table: &mut Table, old: &str, new: &str, deprecations: &mut Vec<Deprecation>) {
    let Some(value) = table.remove(old) else {
        return;
    };
    if table.contains_key(new) {
        deprecations.push(Deprecation::new(
            old,
            format!("`{old}` is deprecated and was ignored because `{new}` is also set"),
        ));
    } else {
        deprecations.push(Deprecation::new(
            old,
            format!("`{old}` is deprecated, use `{new}` instead"),
        ));
        table.insert(new.to_string(), value);
    }
}

fn fold_version_manager(
    table: &mut Table,
    key: &str,
    command: &str,
    deprecations: &mut Vec<Deprecation>,
) -> Result<()> {
    let Some(value) = table.remove(key) else {
        return Ok(());
    };
    let version = match value {
        Value::String(s) => s,
        other => {
            return Err(TmuxupError::malformed(
                key,
                format!("expected a version string, found {}", other.type_str()),
            ));
        }
    };
    let pre = format!("{command} {version}");

    if table.contains_key("pre_window") {
        deprecations.push(Deprecation::new(
            key,
            format!("`{key}` is deprecated and was ignored because `pre_window` is also set"),
        ));
    } else {
        deprecations.push(Deprecation::new(
            key,
            format!("`{key}` is deprecated, use `pre_window = [\"{pre}\"]` instead"),
        ));
        table.insert(
            "pre_window".to_string(),
            Value::Array(vec![Value::String(pre)]),
        );
    }
    Ok(())
}

fn expect_string(value: Value, path: &str) -> Result<Value> {
    match value {
        Value::String(_) => Ok(value),
        other => Err(TmuxupError::malformed(
            path,
            format!("expected a string, found {}", other.type_str()),
        )),
    }
}

fn expect_bool(value: Value, path: &str) -> Result<Value> {
    match value {
        Value::Boolean(_) => Ok(value),
        other => Err(TmuxupError::malformed(
            path,
            format!("expected true or false, found {}", other.type_str()),
        )),
    }
}

fn expect_index(value: Value, path: &str) -> Result<Value> {
    match value {
        Value::Integer(i) if i >= 0 => Ok(value),
        Value::Integer(i) => Err(TmuxupError::malformed(
            path,
            format!("expected a non-negative index, found {i}"),
        )),
        other => Err(TmuxupError::malformed(
            path,
            format!("expected an index, found {}", other.type_str()),
        )),
    }
}

/// A window may be referenced by name or by index; both become strings.
fn window_ref(value: Value, path: &str) -> Result<Value> {
    match value {
        Value::String(_) => Ok(value),
        Value::Integer(i) if i >= 0 => Ok(Value::String(i.to_string())),
        other => Err(TmuxupError::malformed(
            path,
            format!("expected a window name or index, found {}", other.type_str()),
        )),
    }
}

/// Accept a list of command strings, or a single string as a one-element list.
fn command_list(value: Value, path: &str, deprecations: &mut Vec<Deprecation>) -> Result<Value> {
    match value {
        Value::String(command) => {
            deprecations.push(Deprecation::new(
                path,
                format!("a single string for `{path}` is deprecated, use a list of commands"),
            ));
            Ok(Value::Array(vec![Value::String(command)]))
        }
        Value::Array(items) => command_strings(items, path).map(Value::Array),
        other => Err(TmuxupError::malformed(
            path,
            format!("expected a list of commands, found {}", other.type_str()),
        )),
    }
}

fn command_strings(items: Vec<Value>, path: &str) -> Result<Vec<Value>> {
    if let Some(i) = items.iter().position(|item| !item.is_str()) {
        return Err(TmuxupError::malformed(
            format!("{path}[{i}]"),
            format!("expected a command string, found {}", items[i].type_str()),
        ));
    }
    Ok(items)
}

/// Stringify scalar option values so the model only holds strings.
fn options(value: Value, path: &str) -> Result<Value> {
    let table = match value {
        Value::Table(table) => table,
        other => {
            return Err(TmuxupError::malformed(
                path,
                format!("expected a table of tmux options, found {}", other.type_str()),
            ));
        }
    };

    let mut normalized = Table::new();
    for (key, value) in table {
        let text = match value {
            Value::String(s) => s,
            Value::Integer(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Boolean(true) => "on".to_string(),
            Value::Boolean(false) => "off".to_string(),
            other => {
                return Err(TmuxupError::malformed(
                    format!("{path}.{key}"),
                    format!("expected a scalar option value, found {}", other.type_str()),
                ));
            }
        };
        normalized.insert(key, Value::String(text));
    }
    Ok(Value::Table(normalized))
}

fn windows(value: Value, path: &str, deprecations: &mut Vec<Deprecation>) -> Result<Value> {
    let entries = match value {
        Value::Array(entries) => entries,
        other => {
            return Err(TmuxupError::malformed(
                path,
                format!("expected a list of windows, found {}", other.type_str()),
            ));
        }
    };

    // Legacy shorthand: a command string in place of a window, one window each.
    if entries.iter().any(Value::is_str) {
        deprecations.push(Deprecation::new(
            path,
            format!(
                "a list of commands for `{path}` is deprecated, declare each window as a table \
                 such as {{ name = \"editor\", panes = [\"vim\"] }}"
            ),
        ));
    }

    let mut normalized = Vec::with_capacity(entries.len());
    for (i, entry) in entries.into_iter().enumerate() {
        let entry_path = format!("{path}[{i}]");
        match entry {
            Value::String(command) => {
                let mut window = Table::new();
                window.insert(
                    "panes".to_string(),
                    Value::Array(vec![pane_running(vec![Value::String(command)])]),
                );
                normalized.push(Value::Table(window));
            }
            Value::Table(table) => {
                normalized.push(Value::Table(window(table, &entry_path, deprecations)?));
            }
            other => {
                return Err(TmuxupError::malformed(
                    entry_path,
                    format!("expected a window table, found {}", other.type_str()),
                ));
            }
        }
    }
    Ok(Value::Array(normalized))
}

fn window(mut table: Table, path: &str, deprecations: &mut Vec<Deprecation>) -> Result<Table> {
    for key in ["name", "layout", "root"] {
        rewrite(&mut table, key, &format!("{path}.{key}"), expect_string)?;
    }
    for key in ["pre", "commands"] {
        rewrite(&mut table, key, &format!("{path}.{key}"), |value, p| {
            command_list(value, p, deprecations)
        })?;
    }
    rewrite(&mut table, "panes", &format!("{path}.panes"), |value, p| {
        panes(value, p, deprecations)
    })?;
    Ok(table)
}

fn panes(value: Value, path: &str, deprecations: &mut Vec<Deprecation>) -> Result<Value> {
    let entries = match value {
        Value::String(command) => {
            deprecations.push(Deprecation::new(
                path,
                format!("a single string for `{path}` is deprecated, use a list of panes"),
            ));
            return Ok(Value::Array(vec![pane_running(vec![Value::String(command)])]));
        }
        Value::Array(entries) => entries,
        other => {
            return Err(TmuxupError::malformed(
                path,
                format!("expected a list of panes, found {}", other.type_str()),
            ));
        }
    };

    let mut normalized = Vec::with_capacity(entries.len());
    for (i, entry) in entries.into_iter().enumerate() {
        let entry_path = format!("{path}[{i}]");
        let pane = match entry {
            // A bare string is a pane running that single command.
            Value::String(command) => pane_running(vec![Value::String(command)]),
            Value::Array(commands) => pane_running(command_strings(commands, &entry_path)?),
            Value::Table(mut table) => {
                rewrite(&mut table, "root", &format!("{entry_path}.root"), expect_string)?;
                rewrite(&mut table, "commands", &format!("{entry_path}.commands"), |v, p| {
                    command_list(v, p, deprecations)
                })?;
                Value::Table(table)
            }
            other => {
                return Err(TmuxupError::malformed(
                    entry_path,
                    format!("expected a pane, found {}", other.type_str()),
                ));
            }
        };
        normalized.push(pane);
    }
    Ok(Value::Array(normalized))
}

fn pane_running(commands: Vec<Value>) -> Value {
    let mut pane = Table::new();
    pane.insert("commands".to_string(), Value::Array(commands));
    Value::Table(pane)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc(source: &str) -> Table {
        toml::from_str(source).unwrap()
    }

    #[test]
    fn test_canonical_document_is_unchanged() {
        let raw = doc(r#"
            name = "demo"
            root = "/tmp"
            pre = ["echo hi"]
            attach = false

            [[windows]]
            name = "editor"
            panes = [{ commands = ["vim"] }]
        "#);
        let normalized = normalize(&raw).unwrap();
        assert_eq!(normalized.document, raw);
        assert!(normalized.deprecations.is_empty());
    }

    #[test]
    fn test_bare_window_list_expands_with_one_deprecation() {
        let normalized = normalize(&doc(r#"
            name = "demo"
            windows = ["ls", "vim"]
        "#))
        .unwrap();

        let expected = doc(r#"
            name = "demo"
            windows = [
                { panes = [{ commands = ["ls"] }] },
                { panes = [{ commands = ["vim"] }] },
            ]
        "#);
        assert_eq!(normalized.document, expected);
        assert_eq!(normalized.deprecations.len(), 1);
        assert_eq!(normalized.deprecations[0].key, "windows");
    }

    #[test]
    fn test_pre_tab_renamed() {
        let normalized = normalize(&doc(r#"pre_tab = ["nvm use"]"#)).unwrap();
        assert_eq!(
            normalized.document.get("pre_window"),
            Some(&Value::Array(vec![Value::String("nvm use".into())]))
        );
        assert!(!normalized.document.contains_key("pre_tab"));
        assert_eq!(normalized.deprecations.len(), 1);
        assert!(normalized.deprecations[0].message.contains("pre_window"));
    }

    #[test]
    fn test_new_key_wins_over_legacy_key() {
        let normalized = normalize(&doc(r#"
            pre_tab = ["old"]
            pre_window = ["new"]
        "#))
        .unwrap();
        assert_eq!(
            normalized.document.get("pre_window"),
            Some(&Value::Array(vec![Value::String("new".into())]))
        );
        assert_eq!(normalized.deprecations.len(), 1);
        assert!(normalized.deprecations[0].message.contains("ignored"));
    }

    #[test]
    fn test_single_string_commands_become_list() {
        let normalized = normalize(&doc(r#"
            startup = "echo ready"

            [[windows]]
            panes = [{ commands = "vim" }]
        "#))
        .unwrap();
        let expected = doc(r#"
            startup = ["echo ready"]
            windows = [{ panes = [{ commands = ["vim"] }] }]
        "#);
        assert_eq!(normalized.document, expected);
        let keys: Vec<_> = normalized.deprecations.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["startup", "windows[0].panes[0].commands"]);
    }

    #[test]
    fn test_pane_shorthands_do_not_warn() {
        let normalized = normalize(&doc(r#"
            [[windows]]
            panes = ["vim", ["cd src", "cargo watch"]]
        "#))
        .unwrap();
        let expected = doc(r#"
            [[windows]]
            panes = [{ commands = ["vim"] }, { commands = ["cd src", "cargo watch"] }]
        "#);
        assert_eq!(normalized.document, expected);
        assert!(normalized.deprecations.is_empty());
    }

    #[test]
    fn test_rbenv_folds_into_pre_window() {
        let normalized = normalize(&doc(r#"rbenv = "3.2.0""#)).unwrap();
        assert_eq!(
            normalized.document.get("pre_window"),
            Some(&Value::Array(vec![Value::String("rbenv shell 3.2.0".into())]))
        );
        assert_eq!(normalized.deprecations[0].key, "rbenv");
    }

    #[test]
    fn test_options_are_stringified() {
        let normalized = normalize(&doc(r#"
            [options]
            mouse = true
            history-limit = 5000
        "#))
        .unwrap();
        let expected = doc(r#"
            [options]
            mouse = "on"
            history-limit = "5000"
        "#);
        assert_eq!(normalized.document, expected);
    }

    #[test]
    fn test_unknown_keys_pass_through() {
        let raw = doc(r#"
            name = "demo"
            future_feature = { enabled = 1 }
        "#);
        assert_eq!(normalize(&raw).unwrap().document, raw);
    }

    #[test]
    fn test_scalar_windows_is_malformed() {
        let err = normalize(&doc("windows = 3")).unwrap_err();
        match err {
            TmuxupError::MalformedConfig { path, .. } => assert_eq!(path, "windows"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_path_points_into_panes() {
        let err = normalize(&doc(r#"
            [[windows]]
            name = "a"
            [[windows]]
            panes = [{ commands = ["ok", 7] }]
        "#))
        .unwrap_err();
        match err {
            TmuxupError::MalformedConfig { path, .. } => {
                assert_eq!(path, "windows[1].panes[0].commands[1]")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_attach_must_be_bool() {
        assert!(matches!(
            normalize(&doc(r#"attach = "yes""#)),
            Err(TmuxupError::MalformedConfig { .. })
        ));
    }

    #[test]
    fn test_mixed_window_list_rewrites_only_strings() {
        let normalized = normalize(&doc(r#"
            windows = ["ls", { name = "x", commands = "top" }]
        "#))
        .unwrap();
        let expected = doc(r#"
            windows = [
                { panes = [{ commands = ["ls"] }] },
                { name = "x", commands = ["top"] },
            ]
        "#);
        assert_eq!(normalized.document, expected);
        let keys: Vec<_> = normalized.deprecations.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["windows", "windows[1].commands"]);
    }

    #[test]
    fn test_every_legacy_key_is_rewritten() {
        let cases = [
            ("project_name", r#""demo""#, "name"),
            ("project_root", r#""~/src""#, "root"),
            ("tabs", r#"[{ name = "a" }]"#, "windows"),
            ("pre_tab", r#"["nvm use"]"#, "pre_window"),
            ("cli_args", r#""-f ~/.tmux.alt.conf""#, "tmux_options"),
        ];
        for (old, value, new) in cases {
            let normalized = normalize(&doc(&format!("{old} = {value}"))).unwrap();
            let expected = doc(&format!("{new} = {value}"));
            assert_eq!(normalized.document, expected, "renaming `{old}`");
            assert_eq!(normalized.deprecations.len(), 1, "renaming `{old}`");
            assert_eq!(normalized.deprecations[0].key, old);
            assert!(normalized.deprecations[0].message.contains(new));

            let both = format!("{old} = {value}\n{new} = {value}");
            let normalized = normalize(&doc(&both)).unwrap();
            assert_eq!(normalized.document, expected, "conflicting `{old}`");
            assert!(normalized.deprecations[0].message.contains("ignored"));
        }
    }

    #[test]
    fn test_every_version_manager_folds_or_conflicts() {
        let cases = [("rbenv", "rbenv shell 3.2.0"), ("rvm", "rvm use 3.2.0")];
        for (key, command) in cases {
            let normalized = normalize(&doc(&format!(r#"{key} = "3.2.0""#))).unwrap();
            assert_eq!(
                normalized.document,
                doc(&format!(r#"pre_window = ["{command}"]"#)),
                "folding `{key}`"
            );
            assert_eq!(normalized.deprecations[0].key, key);
            assert!(normalized.deprecations[0].message.contains(command));

            let normalized = normalize(&doc(&format!(
                "{key} = \"3.2.0\"\npre_window = [\"nvm use\"]"
            )))
            .unwrap();
            assert_eq!(
                normalized.document,
                doc(r#"pre_window = ["nvm use"]"#),
                "conflicting `{key}`"
            );
            assert_eq!(normalized.deprecations.len(), 1);
            assert_eq!(
                normalized.deprecations[0].message,
                format!("`{key}` is deprecated and was ignored because `pre_window` is also set")
            );
        }
    }
}
