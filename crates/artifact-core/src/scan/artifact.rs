//! Artifact records and the metadata derived from a file name

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path};

/// Extensions that mark a component as a React component
const REACT_EXTENSIONS: &[&str] = &["jsx", "tsx"];

/// How the front end should mount an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    React,
    Vanilla,
}

impl ArtifactKind {
    /// Classify a file by its extension (case-sensitive)
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if REACT_EXTENSIONS.contains(&ext) => ArtifactKind::React,
            _ => ArtifactKind::Vanilla,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::React => "react",
            ArtifactKind::Vanilla => "vanilla",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user-contributed component file as published in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    /// File name stem
    pub id: String,

    /// Human-readable label derived from the stem
    pub name: String,

    /// Forward-slash path relative to the project's source directory
    pub path: String,

    #[serde(rename = "type")]
    pub kind: ArtifactKind,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Modification time in milliseconds since the Unix epoch
    pub modified_at: u64,
}

/// Turn a file stem into a display label: `color-picker` -> `Color Picker`.
///
/// A letter is upper-cased when it follows a non-letter (or starts the
/// string) and lower-cased otherwise, so `my_widget2x` becomes `My_Widget2X`.
pub fn display_name(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut prev_is_letter = false;

    for ch in stem.chars().map(|c| if c == '-' { ' ' } else { c }) {
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }

    out
}

/// Express `target` relative to `base` using forward slashes.
///
/// Both paths are compared component by component; every component of
/// `base` that is not shared with `target` becomes a `..` segment.
pub fn web_path(base: &Path, target: &Path) -> String {
    let base: Vec<Component> = base.components().filter(|c| *c != Component::CurDir).collect();
    let target: Vec<Component> = target
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();

    let shared = base
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = Vec::new();
    for _ in shared..base.len() {
        segments.push("..".to_string());
    }
    for component in &target[shared..] {
        segments.push(component.as_os_str().to_string_lossy().into_owned());
    }

    segments.join("/")
}
