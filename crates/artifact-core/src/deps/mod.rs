//! Dependency reconciliation
//!
//! The scanner hands every external import it saw to a [`Reconciler`], which
//! filters out packages the project already declares or ships as baseline
//! dependencies and asks a [`DependencyInstaller`] for the rest.

pub mod package_json;
pub mod reconcile;

use crate::runtime::PackageManager;
use std::collections::BTreeSet;

pub use package_json::{PackageJson, PackageJsonError, PROJECT_SCRIPTS};
pub use reconcile::{package_name, ReconcileReport, Reconciler};

/// What happened to one requested package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStatus {
    Installed,
    /// Reported only; nothing was launched
    Planned,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub package: String,
    pub status: InstallStatus,
}

impl InstallOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self.status, InstallStatus::Failed(_))
    }
}

/// Capability to make packages available to the project
pub trait DependencyInstaller {
    /// Install every package in `packages`, returning one outcome per package.
    /// A failure for one package must not prevent attempts for the others.
    fn ensure_installed(&mut self, packages: &BTreeSet<String>) -> Vec<InstallOutcome>;
}

impl<T: DependencyInstaller + ?Sized> DependencyInstaller for Box<T> {
    fn ensure_installed(&mut self, packages: &BTreeSet<String>) -> Vec<InstallOutcome> {
        (**self).ensure_installed(packages)
    }
}

/// Installs the latest version of each package, one package manager call per package
pub struct PackageManagerInstaller {
    manager: PackageManager,
}

impl PackageManagerInstaller {
    pub fn new(manager: PackageManager) -> Self {
        Self { manager }
    }
}

impl DependencyInstaller for PackageManagerInstaller {
    fn ensure_installed(&mut self, packages: &BTreeSet<String>) -> Vec<InstallOutcome> {
        packages
            .iter()
            .map(|package| {
                let status = match self.manager.install_latest(package) {
                    Ok(_) => {
                        tracing::info!(%package, "installed dependency");
                        InstallStatus::Installed
                    }
                    Err(e) => {
                        tracing::warn!(%package, error = %e, "failed to install dependency");
                        InstallStatus::Failed(e.to_string())
                    }
                };
                InstallOutcome {
                    package: package.clone(),
                    status,
                }
            })
            .collect()
    }
}

/// Reports what would be installed without launching anything
#[derive(Debug, Default)]
pub struct DryRunInstaller;

impl DependencyInstaller for DryRunInstaller {
    fn ensure_installed(&mut self, packages: &BTreeSet<String>) -> Vec<InstallOutcome> {
        packages
            .iter()
            .map(|package| InstallOutcome {
                package: package.clone(),
                status: InstallStatus::Planned,
            })
            .collect()
    }
}
