//! Artifacts CLI - Scaffold an artifact gallery and keep its manifest current

mod output;

use anyhow::{Context, Result};
use artifact_core::tui::InitArgs;
use artifact_core::Project;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
const LOG_ENV: &str = "ARTIFACTS_LOG";

#[derive(Parser, Debug)]
#[command(name = "artifacts")]
#[command(about = "Scaffold a React artifact gallery and keep its manifest up to date")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new artifact project
    Init(InitCommand),
    /// Scan the artifacts directory and rebuild the manifest
    Scan(ScanCommand),
    /// Copy an artifact file into a project, then scan
    Add(AddCommand),
}

#[derive(Parser, Debug)]
pub struct InitCommand {
    /// Project directory to create or reuse
    pub directory: Option<PathBuf>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,

    /// Local directory to use for templates instead of the built-in one
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// Do not run the package manager
    #[arg(long = "skip-install")]
    pub skip_install: bool,
}

impl From<InitCommand> for InitArgs {
    fn from(args: InitCommand) -> Self {
        InitArgs {
            directory: args.directory,
            template_dir: args.template_dir,
            skip_install: args.skip_install,
            yes: args.yes,
        }
    }
}

#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// The project directory
    #[arg(long = "project", default_value = ".")]
    pub project: PathBuf,

    /// Report missing packages instead of installing them
    #[arg(long = "no-install")]
    pub no_install: bool,
}

#[derive(Parser, Debug)]
pub struct AddCommand {
    /// Artifact file to add
    pub file: PathBuf,

    /// The project directory to add the artifact to
    #[arg(long = "project")]
    pub project: PathBuf,

    /// Report missing packages instead of installing them
    #[arg(long = "no-install")]
    pub no_install: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    tracing::debug!(command = ?args.command, "starting");

    match args.command {
        Command::Init(init_args) => {
            let result = artifact_core::run(init_args.into());

            // Ensure cursor is visible on normal exit
            let _ = console::Term::stderr().show_cursor();

            result
        }
        Command::Scan(scan_args) => scan(&scan_args.project, scan_args.no_install),
        Command::Add(add_args) => add(&add_args.file, &add_args.project, add_args.no_install),
    }
}

fn open_project(dir: &Path) -> Result<Project> {
    if !dir.is_dir() {
        anyhow::bail!("Project directory not found: {}", dir.display());
    }
    let project = Project::open(dir)?;
    tracing::debug!(
        root = %project.paths().root.display(),
        artifacts_dir = %project.paths().artifacts_dir.display(),
        "opened project"
    );
    project.create_layout()?;
    Ok(project)
}

fn scan(dir: &Path, no_install: bool) -> Result<()> {
    let project = open_project(dir)?;
    output::scanning(&project.paths().root);

    let outcome = project
        .scan(project.installer(no_install))
        .context("Scan failed")?;
    output::scan_outcome(&outcome);
    output::scan_complete();

    Ok(())
}

fn add(file: &Path, dir: &Path, no_install: bool) -> Result<()> {
    let project = open_project(dir)?;

    let destination = project.add_artifact(file)?;
    output::added(&destination);

    let outcome = project
        .scan(project.installer(no_install))
        .context("Scan failed")?;
    output::scan_outcome(&outcome);
    output::scan_complete();

    Ok(())
}
