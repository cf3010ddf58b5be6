//! Charm-style `init` flow using cliclack

use crate::project::Project;
use crate::runtime::{check_runtimes, PackageManager};
use crate::templates::{TemplateSource, TAILWIND_CONFIG};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Arguments for the init command
#[derive(Debug, Clone, Default)]
pub struct InitArgs {
    /// Project directory (prompted for when absent)
    pub directory: Option<PathBuf>,

    /// Local directory to use instead of the built-in template
    pub template_dir: Option<PathBuf>,

    /// Skip every package manager call
    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Scaffold a project with interactive prompts
pub fn run(args: InitArgs) -> Result<()> {
    cliclack::intro("Artifact Gallery")?;

    let project_dir = select_directory(&args)?;
    let project = Project::open(&project_dir)?;

    // Step 1: Runtimes
    check_tools(&project, args.skip_install)?;

    // Step 2: Layout
    project.create_layout()?;
    cliclack::log::success(format!(
        "Created {}, {} and {}",
        project.config().artifacts_dir.display(),
        project.config().ui_dir.display(),
        project.config().public_dir.display()
    ))?;

    let manager = (!args.skip_install).then(|| project.package_manager(false));

    // Steps 3 and 4: package.json
    setup_package_json(&project, manager.as_ref())?;

    // Step 5: Baseline dependencies
    if let Some(manager) = &manager {
        run_step(
            "Installing baseline dependencies...",
            "Baseline dependencies installed",
            || project.install_baseline(manager),
        )?;
    }

    // Step 6: Templates
    let tailwind_existed = project.paths().root.join(TAILWIND_CONFIG).exists();
    copy_templates(&project, &TemplateSource::from_option(args.template_dir.clone()))?;

    // Step 7: Dev dependencies
    if let Some(manager) = &manager {
        run_step(
            "Installing dev dependencies...",
            "Dev dependencies installed",
            || project.install_dev_dependencies(manager),
        )?;
    } else {
        cliclack::log::info("Skipping package installation (--skip-install)")?;
    }

    // Step 8: Existing Tailwind config
    if tailwind_existed {
        if project.patch_tailwind()? {
            cliclack::log::success(format!("Updated content paths in {}", TAILWIND_CONFIG))?;
        } else {
            cliclack::log::info(format!("{} left unchanged", TAILWIND_CONFIG))?;
        }
    }

    // Step 9: Next steps
    print_next_steps(&project)?;

    Ok(())
}

fn select_directory(args: &InitArgs) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let path = if let Some(dir) = &args.directory {
        let p = if dir.is_absolute() {
            dir.clone()
        } else {
            current_dir.join(dir)
        };
        cliclack::log::info(format!("Using directory: {}", p.display()))?;
        p
    } else if args.yes {
        current_dir
    } else {
        let input: String = cliclack::input("Project directory")
            .placeholder(".")
            .default_input(".")
            .interact()?;

        if input.is_empty() || input == "." {
            current_dir
        } else {
            let p = PathBuf::from(&input);
            if p.is_absolute() {
                p
            } else {
                current_dir.join(p)
            }
        }
    };

    if path.exists() && !path.is_dir() {
        anyhow::bail!("Not a directory: {}", path.display());
    }

    // Warn if directory exists and has files
    if path.is_dir() {
        if let Ok(entries) = std::fs::read_dir(&path) {
            let count = entries.count();
            if count > 0 {
                cliclack::log::warning(format!("Directory has {} existing items", count))?;

                // Auto-confirm with --yes flag
                let confirm = if args.yes {
                    true
                } else {
                    cliclack::confirm("Continue anyway?")
                        .initial_value(true)
                        .interact()?
                };

                if !confirm {
                    anyhow::bail!("Setup cancelled.");
                }
            }
        }
    } else {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create directory: {}", path.display()))?;
    }

    Ok(path)
}

fn check_tools(project: &Project, skip_install: bool) -> Result<()> {
    let spinner = cliclack::spinner();
    spinner.start("Checking runtimes...");

    match check_runtimes(&project.config().package_manager) {
        Ok(runtimes) => {
            let runtime_info: Vec<String> = runtimes.iter().map(|r| r.describe()).collect();
            spinner.stop(format!("Detected runtimes: {}", runtime_info.join(", ")));
            Ok(())
        }
        Err(e) if skip_install => {
            spinner.stop("Some runtimes are missing");
            cliclack::log::warning(format!("{}", e))?;
            Ok(())
        }
        Err(e) => {
            spinner.stop("Missing runtimes");
            cliclack::log::error(format!("{}", e))?;
            anyhow::bail!("Please install the missing runtimes and try again.");
        }
    }
}

fn setup_package_json(project: &Project, manager: Option<&PackageManager>) -> Result<()> {
    let created = match manager {
        Some(manager) => run_step(
            "Initializing package.json...",
            "package.json ready",
            || project.ensure_package_json(Some(manager)),
        )?,
        None => project.ensure_package_json(None)?,
    };
    if created {
        cliclack::log::success("Created package.json")?;
    }

    if project.write_scripts()? {
        cliclack::log::success("Added dev, build and preview scripts")?;
    } else {
        cliclack::log::warning("Could not parse package.json; scripts not added")?;
    }

    Ok(())
}

fn copy_templates(project: &Project, source: &TemplateSource) -> Result<()> {
    if let TemplateSource::Local(dir) = source {
        cliclack::log::info(format!("Using local template from {}", dir.display()))?;
    }

    let spinner = cliclack::spinner();
    spinner.start("Copying template files...");

    match project.copy_templates(source) {
        Ok(report) => {
            spinner.stop(format!(
                "Created {} files in {}",
                report.written.len(),
                project.paths().root.display()
            ));
            Ok(())
        }
        Err(e) => {
            spinner.error("Failed to copy template");
            Err(e)
        }
    }
}

/// Run one blocking step behind a spinner
fn run_step<T>(start: &str, done: &str, step: impl FnOnce() -> Result<T>) -> Result<T> {
    let spinner = cliclack::spinner();
    spinner.start(start);

    match step() {
        Ok(value) => {
            spinner.stop(done);
            Ok(value)
        }
        Err(e) => {
            spinner.error(format!("{:#}", e));
            Err(e)
        }
    }
}

fn print_next_steps(project: &Project) -> Result<()> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let steps = project.next_steps(&current_dir);

    println!();
    println!("  {}", console::style("Next steps").bold());
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy building!")?;

    Ok(())
}
