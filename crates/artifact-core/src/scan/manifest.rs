//! Paginated manifest consumed by the front end
//!
//! Layout inside the public directory:
//!
//! - `artifacts_manifest.json`: `{"totalArtifacts", "totalPages", "artifactsPerPage"}`
//! - `artifacts_page_<n>.json`: one JSON array per page, `n` starting at 1

use super::artifact::Artifact;
use crate::persist::write_atomic;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const SUMMARY_FILE_NAME: &str = "artifacts_manifest.json";
const PAGE_PREFIX: &str = "artifacts_page_";
const PAGE_SUFFIX: &str = ".json";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid manifest file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestSummary {
    pub total_artifacts: usize,
    pub total_pages: usize,
    pub artifacts_per_page: usize,
}

pub fn summary_path(public_dir: &Path) -> PathBuf {
    public_dir.join(SUMMARY_FILE_NAME)
}

pub fn page_path(public_dir: &Path, page: usize) -> PathBuf {
    public_dir.join(format!("{PAGE_PREFIX}{page}{PAGE_SUFFIX}"))
}

/// Write the whole manifest, replacing whatever an earlier scan left behind.
///
/// Pages are written before the summary so a reader that trusts the summary
/// never sees a page count that points at missing files.
pub fn write_manifest(
    public_dir: &Path,
    artifacts: &[Artifact],
    per_page: usize,
) -> Result<ManifestSummary, ManifestError> {
    let per_page = per_page.max(1);
    let summary = ManifestSummary {
        total_artifacts: artifacts.len(),
        total_pages: artifacts.len().div_ceil(per_page),
        artifacts_per_page: per_page,
    };

    fs::create_dir_all(public_dir).map_err(|source| ManifestError::Write {
        path: public_dir.to_path_buf(),
        source,
    })?;

    for (index, page) in artifacts.chunks(per_page).enumerate() {
        write_json(&page_path(public_dir, index + 1), page)?;
    }
    write_json(&summary_path(public_dir), &summary)?;

    remove_stale_pages(public_dir, summary.total_pages);

    Ok(summary)
}

/// Read the summary and every page back in order
pub fn load_manifest(public_dir: &Path) -> Result<Vec<Artifact>, ManifestError> {
    let summary: ManifestSummary = read_json(&summary_path(public_dir))?;

    let mut artifacts = Vec::with_capacity(summary.total_artifacts);
    for page in 1..=summary.total_pages {
        let items: Vec<Artifact> = read_json(&page_path(public_dir, page))?;
        artifacts.extend(items);
    }

    Ok(artifacts)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), ManifestError> {
    let json = serde_json::to_vec_pretty(value)?;
    write_atomic(path, &json).map_err(|source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ManifestError> {
    let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn page_number(file_name: &str) -> Option<usize> {
    file_name
        .strip_prefix(PAGE_PREFIX)?
        .strip_suffix(PAGE_SUFFIX)?
        .parse()
        .ok()
}

/// Delete page files beyond the current page count
fn remove_stale_pages(public_dir: &Path, total_pages: usize) {
    let Ok(entries) = fs::read_dir(public_dir) else {
        return;
    };

    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(page) = name.to_str().and_then(page_number) else {
            continue;
        };
        if page > total_pages {
            if let Err(e) = fs::remove_file(entry.path()) {
                tracing::warn!(path = %entry.path().display(), error = %e, "failed to remove stale manifest page");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::artifact::ArtifactKind;
    use tempfile::TempDir;

    fn artifacts(count: usize) -> Vec<Artifact> {
        (0..count)
            .map(|i| Artifact {
                id: format!("a{i}"),
                name: format!("A{i}"),
                path: format!("../claude_artifacts/a{i}.jsx"),
                kind: ArtifactKind::React,
                tags: Vec::new(),
                modified_at: 0,
            })
            .collect()
    }

    #[test]
    fn test_pages_and_summary() {
        let temp_dir = TempDir::new().unwrap();
        let summary = write_manifest(temp_dir.path(), &artifacts(5), 2).unwrap();

        assert_eq!(
            summary,
            ManifestSummary {
                total_artifacts: 5,
                total_pages: 3,
                artifacts_per_page: 2,
            }
        );
        assert!(page_path(temp_dir.path(), 3).exists());
        assert!(!page_path(temp_dir.path(), 4).exists());

        let raw = fs::read_to_string(summary_path(temp_dir.path())).unwrap();
        assert!(raw.contains("\"totalArtifacts\": 5"));
        assert!(raw.contains("\"artifactsPerPage\": 2"));

        assert_eq!(load_manifest(temp_dir.path()).unwrap(), artifacts(5));
    }

    #[test]
    fn test_shrinking_manifest_removes_stale_pages() {
        let temp_dir = TempDir::new().unwrap();
        write_manifest(temp_dir.path(), &artifacts(7), 2).unwrap();
        assert!(page_path(temp_dir.path(), 4).exists());

        write_manifest(temp_dir.path(), &artifacts(3), 2).unwrap();
        assert!(page_path(temp_dir.path(), 2).exists());
        assert!(!page_path(temp_dir.path(), 3).exists());
        assert!(!page_path(temp_dir.path(), 4).exists());
        assert_eq!(load_manifest(temp_dir.path()).unwrap().len(), 3);
    }

    #[test]
    fn test_empty_manifest_has_no_pages() {
        let temp_dir = TempDir::new().unwrap();
        write_manifest(temp_dir.path(), &artifacts(1), 12).unwrap();

        let summary = write_manifest(temp_dir.path(), &[], 12).unwrap();
        assert_eq!(summary.total_pages, 0);
        assert!(!page_path(temp_dir.path(), 1).exists());
        assert!(load_manifest(temp_dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_unrelated_files_untouched() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("artifacts_page_notes.json"), "[]").unwrap();
        fs::write(temp_dir.path().join("favicon.ico"), "").unwrap();

        write_manifest(temp_dir.path(), &[], 12).unwrap();

        assert!(temp_dir.path().join("artifacts_page_notes.json").exists());
        assert!(temp_dir.path().join("favicon.ico").exists());
    }

    #[test]
    fn test_missing_directory_created() {
        let temp_dir = TempDir::new().unwrap();
        let public = temp_dir.path().join("missing");
        write_manifest(&public, &artifacts(1), 12).unwrap();
        assert!(summary_path(&public).is_file());
    }

    #[test]
    fn test_write_over_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocked = temp_dir.path().join("public");
        fs::write(&blocked, "not a directory").unwrap();

        let err = write_manifest(&blocked, &artifacts(1), 12).unwrap_err();
        assert!(matches!(err, ManifestError::Write { .. }));
    }

    #[test]
    fn test_page_number() {
        assert_eq!(page_number("artifacts_page_12.json"), Some(12));
        assert_eq!(page_number("artifacts_page_x.json"), None);
        assert_eq!(page_number("artifacts_manifest.json"), None);
    }
}
