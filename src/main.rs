//! tmuxup CLI entry point.
//!
//! This binary provides the `tmuxup` command for managing project files and
//! starting tmux sessions from them.

use clap::Parser;
use std::io::{BufRead, Write};
use tmuxup::cli::{Cli, Commands};
use tmuxup::error::Result;
use tmuxup::store::Store;
use tmuxup::{Compiled, system};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr. `RUST_LOG` wins over `--debug`.
fn setup_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "warn" }));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

/// Main application logic.
fn run(cli: Cli) -> Result<()> {
    let store = Store::discover()?;
    tracing::debug!(dir = %store.root().display(), "using config directory");

    match cli.command {
        Commands::Start { project } => start(&store, &project),
        Commands::Debug { project } => {
            let compiled = compile(&store, &project)?;
            print!("{}", compiled.script);
            Ok(())
        }
        Commands::New { project } => {
            let path = store.create_project(&project)?;
            open_or_doctor(&path)
        }
        Commands::Copy { existing, new } => copy(&store, &existing, &new),
        Commands::Delete { project } => {
            if !store.exists(&project) {
                return Err(tmuxup::TmuxupError::ProjectNotFound(project));
            }
            if confirm(&format!("Are you sure you want to delete {project}? (y/n)"))? {
                store.delete_project(&project)?;
                println!("Deleted {project}");
            }
            Ok(())
        }
        Commands::Implode => {
            if confirm("Are you sure you want to delete all tmuxup projects? (y/n)")? {
                store.implode()?;
                println!("Deleted all tmuxup projects.");
            }
            Ok(())
        }
        Commands::List => {
            println!("tmuxup projects:");
            for project in store.projects()? {
                println!("  {}", project);
            }
            Ok(())
        }
        Commands::Doctor => {
            doctor();
            Ok(())
        }
        Commands::Commands => {
            println!("{}", Commands::NAMES.join("\n"));
            Ok(())
        }
        Commands::Completions { command } => {
            if Commands::completes_projects(&command) {
                println!("{}", store.projects()?.join("\n"));
            }
            Ok(())
        }
    }
}

/// Read a project and its default layer and run the pipeline.
fn compile(store: &Store, project: &str) -> Result<Compiled> {
    let document = store.read_project(project)?;
    let defaults = store.read_defaults()?;
    tmuxup::compile(&document, &defaults)
}

/// Show deprecations (waiting for ENTER so they are not lost), then run the script.
fn start(store: &Store, project: &str) -> Result<()> {
    let compiled = compile(store, project)?;

    if !compiled.deprecations.is_empty() {
        for deprecation in &compiled.deprecations {
            eprintln!("\x1b[31m{}\x1b[0m", deprecation);
        }
        eprintln!();
        eprint!("Press ENTER to continue.");
        std::io::stderr().flush()?;
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
    }

    system::run_script(&compiled.script)
}

fn copy(store: &Store, existing: &str, new: &str) -> Result<()> {
    if !store.exists(existing) {
        return Err(tmuxup::TmuxupError::ProjectNotFound(existing.to_string()));
    }
    if store.exists(new)
        && !confirm(&format!("{new} already exists, would you like to overwrite it? (y/n)"))?
    {
        return Ok(());
    }

    let path = store.copy_project(existing, new)?;
    system::open_in_editor(&path)
}

/// Open a project in `$EDITOR`; if that fails, explain why.
fn open_or_doctor(path: &std::path::Path) -> Result<()> {
    if let Err(e) = system::open_in_editor(path) {
        eprintln!("Error: {}", e);
        doctor();
    }
    Ok(())
}

fn doctor() {
    let checks = [
        ("Checking if tmux is installed", system::tmux_installed("tmux")),
        ("Checking if $EDITOR is set", system::editor().is_some()),
        ("Checking if $SHELL is set", system::shell().is_some()),
    ];
    for (label, ok) in checks {
        println!("{label} ==> {}", if ok { "Yes" } else { "No" });
    }
}

/// Ask a yes/no question on stderr; anything starting with `y` is yes.
fn confirm(question: &str) -> Result<bool> {
    eprint!("\x1b[31m{question}\x1b[0m ");
    std::io::stderr().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().to_lowercase().starts_with('y'))
}
