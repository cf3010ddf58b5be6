//! Plain (non-interactive) terminal output for `scan` and `add`

use artifact_core::deps::InstallStatus;
use artifact_core::ScanOutcome;
use colored::Colorize;
use std::path::Path;

pub fn scanning(project_dir: &Path) {
    println!(
        "{}",
        format!("Scanning artifacts in {}...", project_dir.display()).cyan()
    );
}

pub fn added(destination: &Path) {
    println!("{} {}", "Artifact copied to".green(), destination.display());
}

pub fn scan_outcome(outcome: &ScanOutcome) {
    if outcome.artifacts.is_empty() {
        println!("No artifacts found.");
    } else {
        println!("Found {} artifacts:", outcome.artifacts.len());
        for artifact in &outcome.artifacts {
            println!("- {} ({}) at {}", artifact.name, artifact.kind, artifact.path);
        }
    }

    if outcome.stats.failed > 0 {
        eprintln!(
            "{} {} file(s) could not be read and were skipped",
            "Warning:".yellow(),
            outcome.stats.failed
        );
    }

    if let Some(report) = &outcome.reconcile {
        for result in &report.outcomes {
            match &result.status {
                InstallStatus::Installed => {
                    println!("  {} {}", "installed".green(), result.package);
                }
                InstallStatus::Planned => {
                    println!("  {} {}", "would install".blue(), result.package);
                }
                InstallStatus::Failed(reason) => {
                    eprintln!("  {} {}: {}", "failed".red(), result.package, reason);
                }
            }
        }
    }

    match &outcome.manifest {
        Ok(summary) => println!(
            "{} {} artifact(s) on {} page(s)",
            "Manifest:".dimmed(),
            summary.total_artifacts,
            summary.total_pages
        ),
        Err(e) => eprintln!("{} manifest not written: {}", "Warning:".yellow(), e),
    }

    if let Some(e) = &outcome.cache_error {
        eprintln!("{} {}", "Warning:".yellow(), e);
    }
}

pub fn scan_complete() {
    println!("{}", "Scan complete".green().bold());
}
