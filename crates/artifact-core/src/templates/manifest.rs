//! Template manifest types and parsing

use serde::{Deserialize, Serialize};

/// Manifest file at the root of every template
pub const MANIFEST_FILE_NAME: &str = "template.yaml";

/// One file copied from the template into the project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateFile {
    /// Path inside the template
    pub source: String,

    /// Path inside the project (defaults to source if not specified)
    #[serde(default)]
    pub dest: Option<String>,
}

impl TemplateFile {
    /// Get the destination path (falls back to source if dest not specified)
    pub fn destination(&self) -> &str {
        self.dest.as_deref().unwrap_or(&self.source)
    }
}

/// Per-template manifest (`template.yaml`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Display name of the template
    pub name: String,

    /// Description of what the template provides
    #[serde(default)]
    pub description: String,

    /// Explicit list of files to copy
    pub files: Vec<TemplateFile>,
}

impl TemplateManifest {
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}
