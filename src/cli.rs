//! Command-line interface for tmuxup.
//!
//! Parses arguments using clap and provides the [`Cli`] struct containing
//! all user-specified options.

use clap::{Parser, Subcommand};

/// Command-line arguments for tmuxup.
///
/// # Examples
///
/// ```bash
/// # Create a project and open it in $EDITOR
/// tmuxup new blog
///
/// # Build (or attach to) the session
/// tmuxup start blog
///
/// # Print the generated script without running it
/// tmuxup debug blog
/// ```
#[derive(Parser, Debug)]
#[command(name = "tmuxup")]
#[command(version)]
#[command(about = "Tmux session builder - start sessions from TOML project files")]
#[command(long_about = "tmuxup builds tmux sessions from TOML project files.\n\n\
    Describe windows, panes, working directories and startup commands once,\n\
    then start the whole session with a single command.")]
pub struct Cli {
    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start a tmux session from a project file.
    #[command(visible_alias = "s")]
    Start {
        /// Project name.
        project: String,
    },

    /// Print the shell script generated for a project.
    Debug {
        /// Project name.
        project: String,
    },

    /// Create a new project file and open it in your editor.
    #[command(visible_aliases = ["open", "o", "n"])]
    New {
        /// Project name.
        project: String,
    },

    /// Copy an existing project to a new project and open it in your editor.
    #[command(visible_aliases = ["c", "cp"])]
    Copy {
        /// Project to copy.
        existing: String,
        /// Name of the copy.
        new: String,
    },

    /// Delete a project.
    #[command(visible_aliases = ["d", "rm"])]
    Delete {
        /// Project name.
        project: String,
    },

    /// Delete all projects.
    #[command(visible_alias = "i")]
    Implode,

    /// List all projects.
    #[command(visible_aliases = ["l", "ls"])]
    List,

    /// Look for problems in your environment.
    Doctor,

    /// List the available commands.
    Commands,

    /// Print completion candidates for a command (used by shell completion).
    Completions {
        /// Command being completed.
        command: String,
    },
}

impl Commands {
    /// Names of all subcommands, in display order.
    pub const NAMES: &'static [&'static str] = &[
        "commands",
        "copy",
        "debug",
        "delete",
        "doctor",
        "implode",
        "list",
        "new",
        "start",
    ];

    /// Whether completing `command` should offer project names.
    pub fn completes_projects(command: &str) -> bool {
        matches!(
            command,
            "start" | "s" | "open" | "o" | "new" | "n" | "copy" | "c" | "cp" | "delete" | "d" | "rm"
                | "debug"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases() {
        let cli = Cli::try_parse_from(["tmuxup", "s", "blog"]).unwrap();
        assert_eq!(
            cli.command,
            Commands::Start {
                project: "blog".into()
            }
        );

        let cli = Cli::try_parse_from(["tmuxup", "cp", "a", "b", "--debug"]).unwrap();
        assert!(cli.debug);
        assert_eq!(
            cli.command,
            Commands::Copy {
                existing: "a".into(),
                new: "b".into()
            }
        );
    }

    #[test]
    fn test_completes_projects() {
        assert!(Commands::completes_projects("start"));
        assert!(Commands::completes_projects("rm"));
        assert!(!Commands::completes_projects("list"));
    }

    #[test]
    fn test_command_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
