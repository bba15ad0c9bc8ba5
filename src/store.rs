//! Project file storage.
//!
//! Projects are TOML files in a single config directory, one file per
//! project (`<dir>/<name>.toml`). An optional `default.toml` in the same
//! directory is both the lowest-priority document layer for every project and
//! the template for new ones.
//!
//! The directory is chosen in this order:
//!
//! 1. `$TMUXUP_CONFIG_DIR`
//! 2. `$XDG_CONFIG_HOME/tmuxup`
//! 3. `~/.config/tmuxup`
//! 4. Platform default (e.g., `~/Library/Application Support/tmuxup` on macOS)

use crate::error::{Result, TmuxupError};
use crate::template;
use std::path::{Path, PathBuf};
use toml::Table;
use tracing::debug;

/// File name of the shared default document.
pub const DEFAULT_PROJECT: &str = "default";

const EXTENSION: &str = "toml";

/// Handle to the directory holding project files.
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Use an explicit directory.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Store { root: root.into() }
    }

    /// Find the config directory.
    ///
    /// An existing directory is preferred; if none exists yet, returns
    /// `~/.config/tmuxup` as the location for new projects.
    ///
    /// # Errors
    ///
    /// Returns [`TmuxupError::NoConfigDir`] if the home directory cannot be determined.
    pub fn discover() -> Result<Self> {
        if let Ok(dir) = std::env::var("TMUXUP_CONFIG_DIR") {
            return Ok(Store::at(dir));
        }

        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg).join("tmuxup");
            if path.is_dir() {
                return Ok(Store::at(path));
            }
        }

        let home = dirs::home_dir().ok_or(TmuxupError::NoConfigDir)?;
        let dot_config = home.join(".config").join("tmuxup");
        if dot_config.is_dir() {
            return Ok(Store::at(dot_config));
        }

        if let Some(platform) = dirs::config_dir().map(|d| d.join("tmuxup")) {
            if platform.is_dir() {
                return Ok(Store::at(platform));
            }
        }

        Ok(Store::at(dot_config))
    }

    /// The config directory itself.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file for project `name`, whether or not it exists.
    pub fn project_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{EXTENSION}"))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.project_path(name).is_file()
    }

    /// Names of all projects, sorted alphabetically. `default` is not a project.
    pub fn projects(&self) -> Result<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if stem != DEFAULT_PROJECT {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Read and parse the document for project `name`.
    ///
    /// # Errors
    ///
    /// - [`TmuxupError::ProjectNotFound`] if there is no such project file
    /// - [`TmuxupError::IoError`] if reading fails
    /// - [`TmuxupError::ParseError`] if TOML parsing fails
    pub fn read_project(&self, name: &str) -> Result<Table> {
        if !self.exists(name) {
            return Err(TmuxupError::ProjectNotFound(name.to_string()));
        }
        read_document(&self.project_path(name))
    }

    /// Fallback document layers, highest priority first.
    ///
    /// This is `default.toml` when present, otherwise nothing.
    pub fn read_defaults(&self) -> Result<Vec<Table>> {
        let path = self.project_path(DEFAULT_PROJECT);
        if !path.is_file() {
            return Ok(Vec::new());
        }
        Ok(vec![read_document(&path)?])
    }

    /// Create the file for project `name` from the template, unless it exists.
    ///
    /// Returns the project path either way.
    pub fn create_project(&self, name: &str) -> Result<PathBuf> {
        let path = self.project_path(name);
        if path.is_file() {
            return Ok(path);
        }

        let default_path = self.project_path(DEFAULT_PROJECT);
        let source = if default_path.is_file() {
            std::fs::read_to_string(&default_path)?
        } else {
            template::SAMPLE.to_string()
        };

        self.ensure_dir()?;
        std::fs::write(&path, template::fill(&source, name))?;
        debug!(path = %path.display(), "created project");
        Ok(path)
    }

    /// Copy project `existing` to `new`, replacing `new` if present.
    pub fn copy_project(&self, existing: &str, new: &str) -> Result<PathBuf> {
        if !self.exists(existing) {
            return Err(TmuxupError::ProjectNotFound(existing.to_string()));
        }
        let target = self.project_path(new);
        std::fs::copy(self.project_path(existing), &target)?;
        Ok(target)
    }

    pub fn delete_project(&self, name: &str) -> Result<()> {
        if !self.exists(name) {
            return Err(TmuxupError::ProjectNotFound(name.to_string()));
        }
        std::fs::remove_file(self.project_path(name))?;
        Ok(())
    }

    /// Remove the config directory and every project in it.
    pub fn implode(&self) -> Result<()> {
        if self.root.is_dir() {
            std::fs::remove_dir_all(&self.root)?;
        }
        Ok(())
    }

    /// Ensure the config directory exists, creating it if necessary.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }
}

/// Load and parse a TOML document from the given path.
///
/// # Errors
///
/// - [`TmuxupError::ConfigNotFound`] if the file doesn't exist
/// - [`TmuxupError::IoError`] if reading fails
/// - [`TmuxupError::ParseError`] if TOML parsing fails
pub fn read_document(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(TmuxupError::ConfigNotFound(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path)?;
    let document = toml::from_str(&contents)?;
    Ok(document)
}
