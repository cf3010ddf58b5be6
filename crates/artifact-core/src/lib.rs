//! Artifact Core - Shared library for the `artifacts` CLI
//!
//! This library scaffolds a Vite + React project for user-contributed
//! component files ("artifacts") and keeps a paginated manifest of those
//! files up to date.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Scan cache, import extraction, manifest
//!   writing, dependency reconciliation, template copying, runtime detection
//! - **Layer 2: Workflow Orchestration** - [`Project`] exposes the steps of
//!   `init`, `scan` and `add` for any front end
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use artifact_core::{deps::DryRunInstaller, Project};
//!
//! let project = Project::open(Path::new("."))?;
//! let outcome = project.scan(DryRunInstaller)?;
//! for artifact in &outcome.artifacts {
//!     println!("{} ({})", artifact.name, artifact.kind);
//! }
//! ```

pub mod config;
pub mod deps;
mod persist;
pub mod project;
pub mod runtime;
pub mod scan;
pub mod templates;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::{ConfigError, ProjectConfig, ProjectPaths};
pub use deps::{DependencyInstaller, DryRunInstaller, PackageManagerInstaller, Reconciler};
pub use project::Project;
pub use runtime::{check_runtimes, PackageManager, RuntimeInfo};
pub use scan::{Artifact, ArtifactKind, ArtifactScanner, ScanError, ScanOutcome};
pub use templates::{copy_template, TemplateError, TemplateManifest, TemplateSource};

#[cfg(feature = "tui")]
pub use tui::run;
