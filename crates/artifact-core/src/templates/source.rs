//! Where template files come from

use super::manifest::{TemplateManifest, MANIFEST_FILE_NAME};
use super::TemplateError;
use std::fs;
use std::io;
use std::path::PathBuf;

/// The built-in template, compiled into the binary
const EMBEDDED_FILES: &[(&str, &str)] = &[
    (
        MANIFEST_FILE_NAME,
        include_str!("../../templates/react-vite/template.yaml"),
    ),
    ("utils.js", include_str!("../../templates/react-vite/utils.js")),
    ("App.jsx", include_str!("../../templates/react-vite/App.jsx")),
    ("main.jsx", include_str!("../../templates/react-vite/main.jsx")),
    ("index.css", include_str!("../../templates/react-vite/index.css")),
    ("index.html", include_str!("../../templates/react-vite/index.html")),
    (
        "vite.config.js",
        include_str!("../../templates/react-vite/vite.config.js"),
    ),
    (
        "tailwind.config.js",
        include_str!("../../templates/react-vite/tailwind.config.js"),
    ),
    (
        "postcss.config.js",
        include_str!("../../templates/react-vite/postcss.config.js"),
    ),
    ("card.jsx", include_str!("../../templates/react-vite/card.jsx")),
    ("button.jsx", include_str!("../../templates/react-vite/button.jsx")),
];

/// Template source - either the built-in template or a local directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TemplateSource {
    #[default]
    Embedded,
    Local(PathBuf),
}

impl TemplateSource {
    /// Use the local directory when given, the built-in template otherwise
    pub fn from_option(dir: Option<PathBuf>) -> Self {
        dir.map_or(Self::Embedded, Self::Local)
    }

    /// Human-readable origin for messages
    pub fn describe(&self) -> String {
        match self {
            Self::Embedded => "built-in template".to_string(),
            Self::Local(dir) => dir.display().to_string(),
        }
    }

    pub fn manifest(&self) -> Result<TemplateManifest, TemplateError> {
        let content = self.read_file(MANIFEST_FILE_NAME)?;
        let content = String::from_utf8_lossy(&content);
        TemplateManifest::from_yaml(&content).map_err(|source| TemplateError::Parse {
            origin: self.describe(),
            source,
        })
    }

    /// Read one file of the template by its manifest `source` path
    pub fn read_file(&self, file: &str) -> Result<Vec<u8>, TemplateError> {
        match self {
            Self::Embedded => EMBEDDED_FILES
                .iter()
                .find(|(name, _)| *name == file)
                .map(|(_, content)| content.as_bytes().to_vec())
                .ok_or_else(|| self.missing(file)),
            Self::Local(dir) => {
                let path = dir.join(file);
                fs::read(&path).map_err(|source| {
                    if source.kind() == io::ErrorKind::NotFound {
                        self.missing(file)
                    } else {
                        TemplateError::Read { path, source }
                    }
                })
            }
        }
    }

    fn missing(&self, file: &str) -> TemplateError {
        TemplateError::MissingFile {
            file: file.to_string(),
            origin: self.describe(),
        }
    }
}
