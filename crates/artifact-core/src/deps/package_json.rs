//! Reading and editing the project's `package.json`

use crate::persist::write_atomic;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Scripts every scaffolded project gets
pub const PROJECT_SCRIPTS: &[(&str, &str)] = &[
    ("dev", "vite"),
    ("build", "vite build"),
    ("preview", "vite preview"),
];

#[derive(Debug, Error)]
pub enum PackageJsonError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize package.json: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("{} does not contain a JSON object", .path.display())]
    NotAnObject { path: PathBuf },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A parsed `package.json`, key order preserved
#[derive(Debug, Clone)]
pub struct PackageJson {
    path: PathBuf,
    root: Map<String, Value>,
}

impl PackageJson {
    pub fn read(path: &Path) -> Result<Self, PackageJsonError> {
        let content = fs::read_to_string(path).map_err(|source| PackageJsonError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value =
            serde_json::from_str(&content).map_err(|source| PackageJsonError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        match value {
            Value::Object(root) => Ok(Self {
                path: path.to_path_buf(),
                root,
            }),
            _ => Err(PackageJsonError::NotAnObject {
                path: path.to_path_buf(),
            }),
        }
    }

    /// A bare package named after the project directory, used when no package manager ran `init`
    pub fn minimal(path: &Path, name: &str) -> Self {
        let mut root = Map::new();
        root.insert("name".to_string(), Value::String(name.to_string()));
        root.insert("version".to_string(), Value::String("0.1.0".to_string()));
        root.insert("private".to_string(), Value::Bool(true));
        Self {
            path: path.to_path_buf(),
            root,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names listed under `dependencies` and `devDependencies`
    pub fn declared_dependencies(&self) -> BTreeSet<String> {
        ["dependencies", "devDependencies"]
            .iter()
            .filter_map(|section| self.root.get(*section).and_then(Value::as_object))
            .flat_map(|deps| deps.keys().cloned())
            .collect()
    }

    /// Replace the `scripts` section
    pub fn set_scripts(&mut self, scripts: &[(&str, &str)]) {
        let scripts: Map<String, Value> = scripts
            .iter()
            .map(|(name, command)| (name.to_string(), Value::String(command.to_string())))
            .collect();
        self.root.insert("scripts".to_string(), Value::Object(scripts));
    }

    pub fn write(&self) -> Result<(), PackageJsonError> {
        let mut json = serde_json::to_string_pretty(&self.root)?;
        json.push('\n');
        write_atomic(&self.path, json.as_bytes()).map_err(|source| PackageJsonError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
