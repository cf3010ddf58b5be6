//! Project configuration
//!
//! Every project works with the defaults; an optional `artifacts.yaml` in the
//! project root overrides individual fields.

pub mod layout;

use semver::VersionReq;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

pub use layout::ProjectPaths;

/// Config file looked up in the project root
pub const CONFIG_FILE_NAME: &str = "artifacts.yaml";

/// Environment variable that overrides the package manager program
pub const PACKAGE_MANAGER_ENV: &str = "ARTIFACTS_PACKAGE_MANAGER";

/// Packages every scaffolded project starts with
const BASELINE_DEPENDENCIES: &[(&str, &str)] = &[
    ("@radix-ui/react-icons", "^1.3.0"),
    ("class-variance-authority", "^0.7.0"),
    ("clsx", "^2.1.0"),
    ("lucide-react", "^0.299.0"),
    ("tailwind-merge", "^2.2.0"),
    ("tailwindcss-animate", "^1.0.7"),
    ("@radix-ui/react-slot", "^1.0.2"),
];

/// Build tooling installed as dev dependencies by `init`
pub const DEV_DEPENDENCIES: &[&str] = &[
    "tailwindcss",
    "postcss",
    "autoprefixer",
    "vite",
    "@vitejs/plugin-react",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("baseline dependency '{name}' has an invalid version requirement '{version}': {source}")]
    InvalidVersion {
        name: String,
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("artifacts_per_page must be at least 1")]
    InvalidPageSize,

    #[error("{field} must be a relative path inside the project, got '{}'", .value.display())]
    InvalidDirectory { field: &'static str, value: PathBuf },

    #[error(
        "public_dir '{}' must not be inside artifacts_dir '{}'",
        .public_dir.display(),
        .artifacts_dir.display()
    )]
    PublicInsideArtifacts {
        public_dir: PathBuf,
        artifacts_dir: PathBuf,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Where user-contributed component files live
    pub artifacts_dir: PathBuf,

    /// Base directory that artifact paths in the manifest are relative to
    pub source_dir: PathBuf,

    /// Where bundled UI components are copied
    pub ui_dir: PathBuf,

    /// Where the manifest is published
    pub public_dir: PathBuf,

    pub artifacts_per_page: usize,

    /// Package manager program (`npm`, `pnpm`, ...)
    pub package_manager: String,

    /// Package name -> version requirement
    pub baseline_dependencies: BTreeMap<String, String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: PathBuf::from("claude_artifacts"),
            source_dir: PathBuf::from("src"),
            ui_dir: PathBuf::from("src/components/ui"),
            public_dir: PathBuf::from("public"),
            artifacts_per_page: 12,
            package_manager: "npm".to_string(),
            baseline_dependencies: BASELINE_DEPENDENCIES
                .iter()
                .map(|(name, version)| (name.to_string(), version.to_string()))
                .collect(),
        }
    }
}

impl ProjectConfig {
    /// Load `artifacts.yaml` from the project root, falling back to defaults when absent.
    /// The package manager environment override is applied afterwards.
    pub fn load(project_root: &Path) -> Result<Self, ConfigError> {
        let path = project_root.join(CONFIG_FILE_NAME);
        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        if let Ok(program) = std::env::var(PACKAGE_MANAGER_ENV) {
            if !program.trim().is_empty() {
                config.package_manager = program.trim().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file means "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.artifacts_per_page == 0 {
            return Err(ConfigError::InvalidPageSize);
        }

        for (field, value) in [
            ("artifacts_dir", &self.artifacts_dir),
            ("source_dir", &self.source_dir),
            ("ui_dir", &self.ui_dir),
            ("public_dir", &self.public_dir),
        ] {
            if !is_inside_project(value) {
                return Err(ConfigError::InvalidDirectory {
                    field,
                    value: value.clone(),
                });
            }
        }

        // The scanner would list the manifest files as artifacts
        if normalized(&self.public_dir).starts_with(normalized(&self.artifacts_dir)) {
            return Err(ConfigError::PublicInsideArtifacts {
                public_dir: self.public_dir.clone(),
                artifacts_dir: self.artifacts_dir.clone(),
            });
        }

        for (name, version) in &self.baseline_dependencies {
            VersionReq::parse(version).map_err(|source| ConfigError::InvalidVersion {
                name: name.clone(),
                version: version.clone(),
                source,
            })?;
        }

        Ok(())
    }

    /// Baseline package names, handed to the reconciler
    pub fn baseline_names(&self) -> BTreeSet<String> {
        self.baseline_dependencies.keys().cloned().collect()
    }

    /// `name@version` install arguments for the baseline set
    pub fn baseline_install_specs(&self) -> Vec<String> {
        self.baseline_dependencies
            .iter()
            .map(|(name, version)| format!("{}@{}", name, version))
            .collect()
    }
}

/// Relative, non-empty and free of `..`
pub(crate) fn is_inside_project(path: &Path) -> bool {
    !path.as_os_str().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// `path` without `.` components, so `./a/b` and `a/b` compare equal
fn normalized(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
