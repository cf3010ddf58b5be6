use super::package_json::{PackageJson, PackageJsonError};
use super::{DependencyInstaller, InstallOutcome, InstallStatus};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Package that provides an import specifier: `lodash/debounce` -> `lodash`,
/// `@mui/material/Button` -> `@mui/material`.
pub fn package_name(specifier: &str) -> &str {
    let mut parts = specifier.splitn(3, '/');
    let first = parts.next().unwrap_or(specifier);

    if first.starts_with('@') {
        match parts.next() {
            Some(second) => &specifier[..first.len() + 1 + second.len()],
            None => first,
        }
    } else {
        first
    }
}

/// What reconciliation decided for one dependency set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Package names derived from the requested specifiers
    pub required: BTreeSet<String>,
    /// Already listed in `package.json`
    pub declared: Vec<String>,
    /// Covered by the baseline set
    pub baseline: Vec<String>,
    /// Runtime modules such as `node:fs`
    pub builtin: Vec<String>,
    /// One entry per package handed to the installer
    pub outcomes: Vec<InstallOutcome>,
}

impl ReconcileReport {
    pub fn installed(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| o.status == InstallStatus::Installed)
            .map(|o| o.package.as_str())
    }

    pub fn failed(&self) -> impl Iterator<Item = &InstallOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure())
    }
}

/// Makes sure every externally imported package is available
pub struct Reconciler<I> {
    package_json: PathBuf,
    baseline: BTreeSet<String>,
    installer: I,
}

impl<I: DependencyInstaller> Reconciler<I> {
    pub fn new(package_json: impl Into<PathBuf>, baseline: BTreeSet<String>, installer: I) -> Self {
        Self {
            package_json: package_json.into(),
            baseline,
            installer,
        }
    }

    pub fn installer(&self) -> &I {
        &self.installer
    }

    /// Install whatever in `specifiers` is neither declared nor baseline.
    ///
    /// An absent `package.json` declares nothing; an unreadable one is logged
    /// and treated the same way.
    pub fn reconcile(&mut self, specifiers: &BTreeSet<String>) -> ReconcileReport {
        let declared = self.declared_dependencies();
        let mut report = ReconcileReport::default();
        let mut missing = BTreeSet::new();

        for specifier in specifiers {
            if specifier.starts_with("node:") {
                report.builtin.push(specifier.clone());
                continue;
            }

            let package = package_name(specifier).to_string();
            if !report.required.insert(package.clone()) {
                continue;
            }

            if declared.contains(&package) {
                report.declared.push(package);
            } else if self.baseline.contains(&package) {
                report.baseline.push(package);
            } else {
                missing.insert(package);
            }
        }

        if !missing.is_empty() {
            tracing::info!(count = missing.len(), "installing missing dependencies");
            report.outcomes = self.installer.ensure_installed(&missing);
        }

        report
    }

    fn declared_dependencies(&self) -> BTreeSet<String> {
        match PackageJson::read(&self.package_json) {
            Ok(pkg) => pkg.declared_dependencies(),
            Err(PackageJsonError::Read { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                tracing::debug!(path = %self.package_json.display(), "no package.json, nothing declared yet");
                BTreeSet::new()
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not read declared dependencies");
                BTreeSet::new()
            }
        }
    }
}
