//! Error types for tmuxup.
//!
//! All errors in tmuxup are represented by [`TmuxupError`], which covers
//! malformed or invalid project documents as well as the file and process
//! failures of the surrounding command-line tool.

use std::path::PathBuf;
use thiserror::Error;

/// All possible errors that can occur in tmuxup.
#[derive(Error, Debug)]
pub enum TmuxupError {
    /// A document value has a shape no schema version can interpret.
    #[error("Malformed config at `{path}`: {reason}")]
    MalformedConfig {
        /// Key path of the offending value, e.g. `windows[1].panes`.
        path: String,
        /// What was expected instead.
        reason: String,
    },

    /// The document is well-formed but violates a session invariant.
    #[error("Invalid project: {0}")]
    Validation(String),

    /// No project file exists for the given name.
    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    /// Config file does not exist at the expected path.
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// Could not determine the user's config directory.
    #[error("Could not determine config directory")]
    NoConfigDir,

    /// Failed to read or write a file.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing failed.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// `$EDITOR` is unset or exited unsuccessfully.
    #[error("Editor error: {0}")]
    EditorError(String),

    /// The generated script could not be run.
    #[error("Script error: {0}")]
    ScriptError(String),
}

impl TmuxupError {
    /// Shorthand for building a [`TmuxupError::MalformedConfig`].
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        TmuxupError::MalformedConfig {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Convenient Result type alias for tmuxup operations.
pub type Result<T> = std::result::Result<T, TmuxupError>;
