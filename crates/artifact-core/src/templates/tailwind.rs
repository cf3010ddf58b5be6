//! Point an existing `tailwind.config.js` at the project sources

use super::TemplateError;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::Path;

pub const TAILWIND_CONFIG: &str = "tailwind.config.js";

/// Files Tailwind scans for class names
pub const TAILWIND_CONTENT: &str = r#"content: ["./index.html", "./src/**/*.{js,ts,jsx,tsx}"]"#;

lazy_static! {
    static ref CONTENT_ARRAY: Regex =
        Regex::new(r"(?s)content\s*:\s*\[.*?\]").expect("content array pattern is valid");
}

/// Replace the first `content: [...]` array; `None` when there is none.
pub fn patch_tailwind_content(config: &str) -> Option<String> {
    CONTENT_ARRAY
        .find(config)
        .map(|_| CONTENT_ARRAY.replace(config, TAILWIND_CONTENT).into_owned())
}

/// Patch the config file in place. Returns whether the file changed.
pub fn patch_tailwind_config(path: &Path) -> Result<bool, TemplateError> {
    let content = fs::read_to_string(path).map_err(|source| TemplateError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    match patch_tailwind_content(&content) {
        Some(patched) if patched != content => {
            fs::write(path, patched).map_err(|source| TemplateError::Write {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(true)
        }
        Some(_) => Ok(false),
        None => {
            tracing::warn!(path = %path.display(), "no content array found in tailwind config");
            Ok(false)
        }
    }
}
