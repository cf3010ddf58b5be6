use super::ProjectConfig;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directories of one project, resolved against its root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub artifacts_dir: PathBuf,
    pub source_dir: PathBuf,
    pub ui_dir: PathBuf,
    pub public_dir: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: &Path, config: &ProjectConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            artifacts_dir: root.join(&config.artifacts_dir),
            source_dir: root.join(&config.source_dir),
            ui_dir: root.join(&config.ui_dir),
            public_dir: root.join(&config.public_dir),
        }
    }

    pub fn package_json(&self) -> PathBuf {
        self.root.join("package.json")
    }

    /// Project name used for a freshly written `package.json`
    pub fn project_name(&self) -> String {
        self.root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "artifact-gallery".to_string())
    }

    /// Create the artifact, UI component and public directories
    pub fn ensure_dirs(&self) -> Result<()> {
        for dir in [&self.artifacts_dir, &self.ui_dir, &self.public_dir] {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }
}
