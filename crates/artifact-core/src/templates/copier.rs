//! Template file copying

use super::source::TemplateSource;
use super::TemplateError;
use crate::config::is_inside_project;
use std::fs;
use std::path::Path;

/// What a copy did, by destination path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub written: Vec<String>,
    /// Listed in `keep_existing` and already present, so left untouched
    pub kept: Vec<String>,
}

/// Copy every file listed in the template manifest into `target_dir`.
///
/// Destinations named in `keep_existing` that already exist are not
/// overwritten. Every destination is validated and every source read
/// before the first write, so a broken template leaves the project alone.
pub fn copy_template(
    source: &TemplateSource,
    target_dir: &Path,
    keep_existing: &[&str],
) -> Result<CopyReport, TemplateError> {
    let manifest = source.manifest()?;

    let mut pending = Vec::with_capacity(manifest.files.len());
    for file in &manifest.files {
        let dest = file.destination();
        if !is_inside_project(Path::new(dest)) {
            return Err(TemplateError::InvalidDestination {
                dest: dest.to_string(),
            });
        }
        pending.push((dest, source.read_file(&file.source)?));
    }

    let mut report = CopyReport::default();
    for (dest, content) in pending {
        let target_path = target_dir.join(dest);

        if keep_existing.contains(&dest) && target_path.exists() {
            tracing::debug!(file = %dest, "keeping existing file");
            report.kept.push(dest.to_string());
            continue;
        }

        // Ensure parent directories exist
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent).map_err(|source| TemplateError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        fs::write(&target_path, &content).map_err(|source| TemplateError::Write {
            path: target_path.clone(),
            source,
        })?;
        report.written.push(dest.to_string());
    }

    Ok(report)
}
