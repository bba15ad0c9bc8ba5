//! # tmuxup
//!
//! Compiles declarative TOML project files into the shell script that builds a
//! tmux session: windows, panes, working directories, layouts, and the
//! commands typed into each pane.
//!
//! ## Features
//!
//! - **Windows and panes**: ordered, with per-pane commands and working directories
//! - **Inheritance**: `root` and pre-commands cascade from session to window to pane
//! - **Default layers**: a shared `default.toml` fills in keys a project leaves out
//! - **Legacy syntax**: older key names and shorthands are rewritten with a warning
//! - **Idempotent scripts**: re-running a script attaches to the existing session
//!
//! ## Quick Example
//!
//! ```
//! let project: toml::Table = toml::from_str(r#"
//!     name = "demo"
//!     root = "/tmp"
//!
//!     [[windows]]
//!     name = "editor"
//!     panes = ["vim"]
//! "#).unwrap();
//!
//! let compiled = tmuxup::compile(&project, &[]).unwrap();
//! assert!(compiled.deprecations.is_empty());
//! assert_eq!(
//!     compiled.script.lines()[1],
//!     "  TMUX= tmux new-session -d -s demo -n editor -c /tmp"
//! );
//! ```
//!
//! ## Architecture
//!
//! The pipeline is normalize, load, render; each stage is a pure function.
//!
//! - [`normalize`]: legacy key and shape rewriting, deprecation messages
//! - [`config`]: serde types for the normalized document
//! - [`loader`]: default-layer merging and validation
//! - [`model`]: the immutable [`Specification`]
//! - [`render`]: script generation
//! - [`quote`]: POSIX shell quoting
//! - [`store`]: project files on disk
//! - [`template`]: the template for new projects
//! - [`system`]: environment checks, `$EDITOR`, and running scripts
//! - [`cli`]: command-line argument parsing with clap
//! - [`error`]: error types

pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod quote;
pub mod render;
pub mod store;
pub mod system;
pub mod template;

pub use config::Layout;
pub use error::{Result, TmuxupError};
pub use model::{Pane, Socket, Specification, Window};
pub use normalize::{Deprecation, Normalized};
pub use render::Script;

use toml::Table;

/// Result of running the whole pipeline.
#[derive(Debug, Clone)]
pub struct Compiled {
    pub specification: Specification,
    pub script: Script,
    /// Deprecations from the project document first, then each default layer.
    pub deprecations: Vec<Deprecation>,
}

/// Normalize every document, load the specification, and render it.
///
/// `defaults` are raw fallback documents, highest priority first.
///
/// # Errors
///
/// Any [`TmuxupError::MalformedConfig`] or [`TmuxupError::Validation`] error
/// aborts the pipeline before rendering.
pub fn compile(project: &Table, defaults: &[Table]) -> Result<Compiled> {
    let normalized = normalize::normalize(project)?;
    let mut deprecations = normalized.deprecations;

    let mut layers = Vec::with_capacity(defaults.len());
    for layer in defaults {
        let layer = normalize::normalize(layer)?;
        deprecations.extend(layer.deprecations);
        layers.push(layer.document);
    }

    let specification = loader::load(&normalized.document, &layers)?;
    let script = render::render(&specification);

    Ok(Compiled {
        specification,
        script,
        deprecations,
    })
}
