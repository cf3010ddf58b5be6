//! Project templates
//!
//! This module provides:
//! - The template manifest (`template.yaml`) types
//! - Template sources: the built-in template or a local directory
//! - Copying a template into a project
//! - The `tailwind.config.js` content patch

pub mod copier;
pub mod manifest;
pub mod source;
pub mod tailwind;

use std::path::PathBuf;
use thiserror::Error;

pub use copier::{copy_template, CopyReport};
pub use manifest::{TemplateFile, TemplateManifest, MANIFEST_FILE_NAME};
pub use source::TemplateSource;
pub use tailwind::{patch_tailwind_config, patch_tailwind_content, TAILWIND_CONFIG, TAILWIND_CONTENT};

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse template manifest from {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("template file '{file}' is listed in the manifest but missing from {origin}")]
    MissingFile { file: String, origin: String },

    #[error("template destination '{dest}' must be a relative path inside the project")]
    InvalidDestination { dest: String },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
