//! One artifact project on disk
//!
//! [`Project`] bundles the configuration and resolved layout of a project and
//! exposes the individual steps of `init`, `scan` and `add`. Front ends (the
//! cliclack prompts, the plain CLI, tests) decide how to present each step.

use crate::config::{ProjectConfig, ProjectPaths, DEV_DEPENDENCIES};
use crate::deps::{
    DependencyInstaller, DryRunInstaller, PackageJson, PackageJsonError, PackageManagerInstaller,
    Reconciler, PROJECT_SCRIPTS,
};
use crate::runtime::PackageManager;
use crate::scan::{ArtifactScanner, ScanError, ScanOutcome, ScanSettings};
use crate::templates::{
    copy_template, patch_tailwind_config, CopyReport, TemplateSource, TAILWIND_CONFIG,
};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Project {
    config: ProjectConfig,
    paths: ProjectPaths,
}

impl Project {
    pub fn new(root: &Path, config: ProjectConfig) -> Self {
        let paths = ProjectPaths::new(root, &config);
        Self { config, paths }
    }

    /// Load `artifacts.yaml` (if any) from `root`
    pub fn open(root: &Path) -> Result<Self> {
        let config = ProjectConfig::load(root)
            .with_context(|| format!("Invalid project configuration in {}", root.display()))?;
        Ok(Self::new(root, config))
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn paths(&self) -> &ProjectPaths {
        &self.paths
    }

    pub fn package_manager(&self, echo: bool) -> PackageManager {
        PackageManager::new(self.config.package_manager.clone(), self.paths.root.clone())
            .with_echo(echo)
    }

    /// The installer `scan` and `add` use: the package manager, or a dry run
    pub fn installer(&self, dry_run: bool) -> Box<dyn DependencyInstaller> {
        if dry_run {
            Box::new(DryRunInstaller)
        } else {
            Box::new(PackageManagerInstaller::new(self.package_manager(true)))
        }
    }

    pub fn scanner<I: DependencyInstaller>(&self, installer: I) -> ArtifactScanner<I> {
        ArtifactScanner::new(
            ScanSettings {
                web_base_dir: self.paths.source_dir.clone(),
                public_dir: self.paths.public_dir.clone(),
                artifacts_per_page: self.config.artifacts_per_page,
            },
            Reconciler::new(
                self.paths.package_json(),
                self.config.baseline_names(),
                installer,
            ),
        )
    }

    /// Scan the artifacts directory
    pub fn scan<I: DependencyInstaller>(&self, installer: I) -> Result<ScanOutcome, ScanError> {
        self.scanner(installer).scan(&self.paths.artifacts_dir)
    }

    /// Copy `file` into the artifacts directory, returning its new path.
    /// A file that already lives there is left as is.
    pub fn add_artifact(&self, file: &Path) -> Result<PathBuf> {
        let metadata = fs::metadata(file)
            .with_context(|| format!("Artifact file not found: {}", file.display()))?;
        if !metadata.is_file() {
            anyhow::bail!("Not a regular file: {}", file.display());
        }

        let file_name = file
            .file_name()
            .with_context(|| format!("Invalid artifact path: {}", file.display()))?;

        fs::create_dir_all(&self.paths.artifacts_dir).with_context(|| {
            format!(
                "Failed to create directory: {}",
                self.paths.artifacts_dir.display()
            )
        })?;

        let destination = self.paths.artifacts_dir.join(file_name);
        if is_same_file(file, &destination) {
            tracing::debug!(file = %destination.display(), "artifact already in place");
            return Ok(destination);
        }

        fs::copy(file, &destination).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                file.display(),
                destination.display()
            )
        })?;

        Ok(destination)
    }

    /// Create the artifact, UI component and public directories
    pub fn create_layout(&self) -> Result<()> {
        self.paths.ensure_dirs()
    }

    /// Make sure a `package.json` exists: `npm init -y` when a package manager
    /// is given, a minimal file otherwise. Returns whether one was created.
    pub fn ensure_package_json(&self, manager: Option<&PackageManager>) -> Result<bool> {
        let path = self.paths.package_json();
        if path.exists() {
            return Ok(false);
        }

        match manager {
            Some(manager) => {
                manager
                    .init()
                    .context("Failed to initialize package.json")?;
            }
            None => {
                PackageJson::minimal(&path, &self.paths.project_name())
                    .write()
                    .context("Failed to write package.json")?;
            }
        }

        Ok(true)
    }

    /// Set the dev/build/preview scripts. An unparsable `package.json` is left
    /// alone and reported as `Ok(false)`.
    pub fn write_scripts(&self) -> Result<bool> {
        let path = self.paths.package_json();
        let mut package = match PackageJson::read(&path) {
            Ok(package) => package,
            Err(e @ (PackageJsonError::Parse { .. } | PackageJsonError::NotAnObject { .. })) => {
                tracing::warn!(error = %e, "package.json left untouched");
                return Ok(false);
            }
            Err(e) => return Err(e).context("Failed to read package.json"),
        };

        package.set_scripts(PROJECT_SCRIPTS);
        package.write().context("Failed to update package.json")?;
        Ok(true)
    }

    /// `npm install name@version ...` for the baseline set
    pub fn install_baseline(&self, manager: &PackageManager) -> Result<()> {
        manager
            .install(&self.config.baseline_install_specs(), false)
            .context("Failed to install baseline dependencies")?;
        Ok(())
    }

    /// `npm install -D` for the build tooling
    pub fn install_dev_dependencies(&self, manager: &PackageManager) -> Result<()> {
        let packages: Vec<String> = DEV_DEPENDENCIES.iter().map(|p| p.to_string()).collect();
        manager
            .install(&packages, true)
            .context("Failed to install dev dependencies")?;
        Ok(())
    }

    /// Copy the template; an existing `tailwind.config.js` is kept for patching
    pub fn copy_templates(&self, source: &TemplateSource) -> Result<CopyReport> {
        copy_template(source, &self.paths.root, &[TAILWIND_CONFIG])
            .with_context(|| format!("Failed to copy template from {}", source.describe()))
    }

    /// Point a pre-existing Tailwind config at the project sources.
    /// Returns whether the file changed.
    pub fn patch_tailwind(&self) -> Result<bool> {
        let path = self.paths.root.join(TAILWIND_CONFIG);
        patch_tailwind_config(&path).with_context(|| format!("Failed to patch {}", path.display()))
    }

    /// Instructions shown once `init` is done, with paths relative to `cwd`
    pub fn next_steps(&self, cwd: &Path) -> Vec<String> {
        let mut steps = Vec::new();

        if self.paths.root != cwd {
            let dir = self
                .paths
                .root
                .strip_prefix(cwd)
                .unwrap_or(&self.paths.root);
            steps.push(format!("cd {}", dir.display()));
        }

        steps.push(format!(
            "Put component files in {}/",
            self.config.artifacts_dir.display()
        ));
        steps.push("artifacts scan".to_string());
        steps.push(format!("{} run dev", self.config.package_manager));

        steps
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;

    fn project(dir: &TempDir) -> Project {
        Project::new(dir.path(), ProjectConfig::default())
    }

    #[test]
    fn test_minimal_package_json_with_scripts() {
        let temp_dir = TempDir::new().unwrap();
        let project = project(&temp_dir);

        assert!(project.ensure_package_json(None).unwrap());
        assert!(!project.ensure_package_json(None).unwrap());
        assert!(project.write_scripts().unwrap());

        let raw = fs::read_to_string(temp_dir.path().join("package.json")).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["scripts"]["dev"], "vite");
    }

    #[test]
    fn test_unparsable_package_json_left_alone() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("package.json"), "{ broken").unwrap();

        assert!(!project(&temp_dir).write_scripts().unwrap());
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("package.json")).unwrap(),
            "{ broken"
        );
    }

    #[test]
    fn test_add_artifact_copies_file() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("chart.jsx");
        fs::write(&source, "export default () => null;").unwrap();

        let project = project(&temp_dir);
        let dest = project.add_artifact(&source).unwrap();
        assert_eq!(dest, temp_dir.path().join("claude_artifacts/chart.jsx"));
        assert!(dest.is_file());

        // Adding the copy again is a no-op
        assert_eq!(project.add_artifact(&dest).unwrap(), dest);
        assert_eq!(fs::read_to_string(&dest).unwrap(), "export default () => null;");
    }

    #[test]
    fn test_add_rejects_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(project(&temp_dir).add_artifact(temp_dir.path()).is_err());
    }

    #[test]
    fn test_existing_tailwind_config_patched() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(
            temp_dir.path().join(TAILWIND_CONFIG),
            "module.exports = { content: [], theme: {} }",
        )
        .unwrap();

        let project = project(&temp_dir);
        let report = project.copy_templates(&TemplateSource::Embedded).unwrap();
        assert_eq!(report.kept, vec![TAILWIND_CONFIG]);
        assert!(project.patch_tailwind().unwrap());

        let config = fs::read_to_string(temp_dir.path().join(TAILWIND_CONFIG)).unwrap();
        assert!(config.starts_with("module.exports"));
        assert!(config.contains("./src/**/*.{js,ts,jsx,tsx}"));
    }

    #[test]
    fn test_next_steps() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("gallery");
        let project = Project::new(&root, ProjectConfig::default());

        let steps = project.next_steps(temp_dir.path());
        assert_eq!(steps[0], "cd gallery");
        assert_eq!(steps.last().unwrap(), "npm run dev");

        let steps = project.next_steps(&root);
        assert_eq!(steps[0], "Put component files in claude_artifacts/");
    }

    #[test]
    fn test_scan_with_dry_run_installer() {
        let temp_dir = TempDir::new().unwrap();
        let project = project(&temp_dir);
        project.create_layout().unwrap();
        fs::write(
            project.paths().artifacts_dir.join("b.jsx"),
            "import dep from 'pkg';",
        )
        .unwrap();

        let outcome = project.scan(project.installer(true)).unwrap();
        assert_eq!(outcome.artifacts.len(), 1);
        assert!(temp_dir.path().join("public/artifacts_manifest.json").is_file());
    }
}
