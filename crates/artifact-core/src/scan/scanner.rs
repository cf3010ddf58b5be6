//! Incremental scan of an artifacts directory
//!
//! Files whose fingerprint matches the cache are reused without being opened.
//! Everything else is read, parsed for imports and tags, and turned into a
//! fresh cache entry. Problems with a single file never abort the scan.

use super::artifact::{display_name, web_path, Artifact, ArtifactKind};
use super::cache::{CacheEntry, CacheError, Fingerprint, ScanCache, CACHE_FILE_NAME};
use super::imports::extract_imports;
use super::manifest::{write_manifest, ManifestError, ManifestSummary};
use super::tags::extract_tags;
use crate::deps::{DependencyInstaller, ReconcileReport, Reconciler};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("cannot access artifacts directory {}: {source}", .path.display())]
    Inaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a directory", .path.display())]
    NotADirectory { path: PathBuf },
}

/// Why a single file was left out of a scan
#[derive(Debug, Error)]
enum FileError {
    #[error("failed to stat: {0}")]
    Stat(#[source] io::Error),

    #[error("failed to read: {0}")]
    Read(#[source] io::Error),

    #[error("content is not valid UTF-8")]
    Decode(#[source] std::string::FromUtf8Error),

    #[error("file name is not valid UTF-8")]
    FileName,
}

/// Where a scan publishes its results
#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// Artifact paths in the manifest are relative to this directory
    pub web_base_dir: PathBuf,
    pub public_dir: PathBuf,
    pub artifacts_per_page: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Candidate files seen
    pub total: usize,
    /// Read and parsed this run
    pub processed: usize,
    /// Reused from the cache
    pub cached: usize,
    /// Skipped because of a per-file failure
    pub failed: usize,
}

#[derive(Debug)]
pub struct ScanOutcome {
    /// Manifest order: lexicographic by file name
    pub artifacts: Vec<Artifact>,
    pub stats: ScanStats,
    /// Union of external imports over every artifact
    pub dependencies: BTreeSet<String>,
    /// Present when there was at least one dependency to reconcile
    pub reconcile: Option<ReconcileReport>,
    pub manifest: Result<ManifestSummary, ManifestError>,
    pub cache_error: Option<CacheError>,
}

impl ScanOutcome {
    pub fn manifest_written(&self) -> bool {
        self.manifest.is_ok()
    }
}

pub struct ArtifactScanner<I> {
    settings: ScanSettings,
    reconciler: Reconciler<I>,
}

impl<I: DependencyInstaller> ArtifactScanner<I> {
    pub fn new(settings: ScanSettings, reconciler: Reconciler<I>) -> Self {
        Self {
            settings,
            reconciler,
        }
    }

    pub fn reconciler(&self) -> &Reconciler<I> {
        &self.reconciler
    }

    /// Scan `dir`, publish the manifest and persist the cache.
    ///
    /// Only a directory that cannot be listed is an error; everything after
    /// that is logged and reported through [`ScanOutcome`].
    pub fn scan(&mut self, dir: &Path) -> Result<ScanOutcome, ScanError> {
        let metadata = fs::metadata(dir).map_err(|source| ScanError::Inaccessible {
            path: dir.to_path_buf(),
            source,
        })?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }
        fs::read_dir(dir).map_err(|source| ScanError::Inaccessible {
            path: dir.to_path_buf(),
            source,
        })?;

        let cache_path = dir.join(CACHE_FILE_NAME);
        let previous = ScanCache::load(&cache_path);
        let mut next = ScanCache::new();

        let mut artifacts = Vec::new();
        let mut dependencies = BTreeSet::new();
        let mut stats = ScanStats::default();

        for entry in candidate_files(dir) {
            stats.total += 1;

            match self.scan_file(&entry, &previous) {
                Ok((file_name, record, from_cache)) => {
                    if from_cache {
                        stats.cached += 1;
                    } else {
                        stats.processed += 1;
                    }
                    dependencies.extend(record.dependencies.iter().cloned());
                    artifacts.push(record.artifact.clone());
                    next.insert(file_name, record);
                }
                Err(e) => {
                    stats.failed += 1;
                    tracing::warn!(file = %entry.path().display(), error = %e, "skipping artifact");
                }
            }
        }

        tracing::info!(
            total = stats.total,
            processed = stats.processed,
            cached = stats.cached,
            failed = stats.failed,
            "scanned artifacts directory"
        );

        let reconcile = if dependencies.is_empty() {
            None
        } else {
            Some(self.reconciler.reconcile(&dependencies))
        };

        let manifest = write_manifest(
            &self.settings.public_dir,
            &artifacts,
            self.settings.artifacts_per_page,
        );
        if let Err(e) = &manifest {
            tracing::error!(error = %e, "failed to write manifest");
        }

        let cache_error = next.save(&cache_path).err();
        if let Some(e) = &cache_error {
            tracing::warn!(error = %e, "failed to persist scan cache");
        }

        Ok(ScanOutcome {
            artifacts,
            stats,
            dependencies,
            reconcile,
            manifest,
            cache_error,
        })
    }

    /// Produce the cache entry for one file, reusing `previous` when the
    /// fingerprint still matches
    fn scan_file(
        &self,
        entry: &DirEntry,
        previous: &ScanCache,
    ) -> Result<(String, CacheEntry, bool), FileError> {
        let file_name = entry
            .file_name()
            .to_str()
            .ok_or(FileError::FileName)?
            .to_string();

        let metadata = entry
            .metadata()
            .map_err(|e| FileError::Stat(e.into()))?;
        let fingerprint = Fingerprint::from_metadata(&metadata).map_err(FileError::Stat)?;

        if let Some(cached) = previous.lookup(&file_name, &fingerprint) {
            tracing::trace!(file = %file_name, "cache hit");
            return Ok((file_name, cached.clone(), true));
        }

        let bytes = fs::read(entry.path()).map_err(FileError::Read)?;
        let content = String::from_utf8(bytes).map_err(FileError::Decode)?;

        let imports = extract_imports(&content);
        tracing::debug!(
            file = %file_name,
            strategy = ?imports.strategy,
            imports = imports.specifiers.len(),
            "processed artifact"
        );

        let path = entry.path();
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let artifact = Artifact {
            name: display_name(&stem),
            id: stem,
            path: web_path(&self.settings.web_base_dir, path),
            kind: ArtifactKind::from_path(path),
            tags: extract_tags(&content),
            modified_at: fingerprint.modified_millis(),
        };

        Ok((
            file_name,
            CacheEntry {
                fingerprint,
                dependencies: imports.specifiers,
                artifact,
            },
            false,
        ))
    }
}

/// Regular files directly inside `dir`, hidden files and the cache excluded,
/// sorted by file name
fn candidate_files(dir: &Path) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            !name.starts_with('.') && name != CACHE_FILE_NAME
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps::{DryRunInstaller, InstallStatus};
    use tempfile::TempDir;

    fn scanner(project: &Path) -> ArtifactScanner<DryRunInstaller> {
        ArtifactScanner::new(
            ScanSettings {
                web_base_dir: project.join("src"),
                public_dir: project.join("public"),
                artifacts_per_page: 12,
            },
            Reconciler::new(
                project.join("package.json"),
                ["clsx".to_string()].into_iter().collect(),
                DryRunInstaller,
            ),
        )
    }

    fn artifacts_dir(project: &TempDir) -> PathBuf {
        let dir = project.path().join("claude_artifacts");
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_artifact_metadata() {
        let project = TempDir::new().unwrap();
        let dir = artifacts_dir(&project);
        fs::write(
            dir.join("color-picker.jsx"),
            "/* @tags: ui, color */\nimport { clsx } from 'clsx';\nexport default () => null;\n",
        )
        .unwrap();

        let outcome = scanner(project.path()).scan(&dir).unwrap();
        let artifact = &outcome.artifacts[0];
        assert_eq!(artifact.id, "color-picker");
        assert_eq!(artifact.name, "Color Picker");
        assert_eq!(artifact.path, "../claude_artifacts/color-picker.jsx");
        assert_eq!(artifact.kind, ArtifactKind::React);
        assert_eq!(artifact.tags, vec!["ui", "color"]);
        assert!(artifact.modified_at > 0);

        // clsx is baseline, so nothing is planned
        let report = outcome.reconcile.unwrap();
        assert_eq!(report.baseline, vec!["clsx"]);
        assert!(report.outcomes.is_empty());
    }

    #[test]
    fn test_hidden_files_and_subdirectories_ignored() {
        let project = TempDir::new().unwrap();
        let dir = artifacts_dir(&project);
        fs::write(dir.join(".draft.jsx"), "export default 1;").unwrap();
        fs::create_dir(dir.join("nested")).unwrap();
        fs::write(dir.join("nested/inner.jsx"), "export default 1;").unwrap();
        fs::write(dir.join("widget.js"), "export default 1;").unwrap();

        let outcome = scanner(project.path()).scan(&dir).unwrap();
        let ids: Vec<&str> = outcome.artifacts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["widget"]);
        assert_eq!(outcome.artifacts[0].kind, ArtifactKind::Vanilla);
    }

    #[test]
    fn test_second_scan_served_from_cache() {
        let project = TempDir::new().unwrap();
        let dir = artifacts_dir(&project);
        fs::write(dir.join("a.jsx"), "import x from 'pkg';").unwrap();

        let mut scanner = scanner(project.path());
        let first = scanner.scan(&dir).unwrap();
        assert_eq!(first.stats.processed, 1);

        let second = scanner.scan(&dir).unwrap();
        assert_eq!(second.stats.processed, 0);
        assert_eq!(second.stats.cached, 1);
        assert_eq!(second.artifacts, first.artifacts);
        assert_eq!(second.dependencies, first.dependencies);
    }

    #[test]
    fn test_undecodable_file_skipped() {
        let project = TempDir::new().unwrap();
        let dir = artifacts_dir(&project);
        fs::write(dir.join("bad.jsx"), [0xff, 0xfe, 0x00, 0xc3]).unwrap();
        fs::write(dir.join("good.jsx"), "export default 1;").unwrap();

        let outcome = scanner(project.path()).scan(&dir).unwrap();
        assert_eq!(outcome.stats.failed, 1);
        assert_eq!(outcome.artifacts.len(), 1);

        let cache = ScanCache::load(&dir.join(CACHE_FILE_NAME));
        assert_eq!(cache.len(), 1);
        assert!(cache.get("bad.jsx").is_none());
        assert!(cache.get("good.jsx").is_some());
    }

    #[test]
    fn test_duplicate_stems_kept() {
        let project = TempDir::new().unwrap();
        let dir = artifacts_dir(&project);
        fs::write(dir.join("chart.js"), "export default 1;").unwrap();
        fs::write(dir.join("chart.jsx"), "export default 1;").unwrap();

        let outcome = scanner(project.path()).scan(&dir).unwrap();
        let ids: Vec<&str> = outcome.artifacts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["chart", "chart"]);
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let project = TempDir::new().unwrap();
        let result = scanner(project.path()).scan(&project.path().join("nope"));
        assert!(matches!(result, Err(ScanError::Inaccessible { .. })));
    }

    #[test]
    fn test_manifest_failure_keeps_results() {
        let project = TempDir::new().unwrap();
        let dir = artifacts_dir(&project);
        fs::write(dir.join("a.jsx"), "export default 1;").unwrap();
        // A regular file where the public directory should be
        fs::write(project.path().join("public"), "blocked").unwrap();

        let outcome = scanner(project.path()).scan(&dir).unwrap();
        assert!(!outcome.manifest_written());
        assert!(matches!(outcome.manifest, Err(ManifestError::Write { .. })));
        assert_eq!(outcome.artifacts.len(), 1);
        assert!(outcome.cache_error.is_none());
        assert!(ScanCache::load(&dir.join(CACHE_FILE_NAME)).get("a.jsx").is_some());
    }

    #[test]
    fn test_cache_failure_keeps_results() {
        let project = TempDir::new().unwrap();
        let dir = artifacts_dir(&project);
        fs::write(dir.join("a.jsx"), "export default 1;").unwrap();
        // A directory where the cache file should be
        fs::create_dir(dir.join(CACHE_FILE_NAME)).unwrap();

        let mut scanner = scanner(project.path());
        let outcome = scanner.scan(&dir).unwrap();
        assert!(matches!(outcome.cache_error, Some(CacheError::Write { .. })));
        assert!(outcome.manifest_written());
        assert_eq!(outcome.artifacts.len(), 1);

        // Nothing was persisted, so the next scan reprocesses the file
        let again = scanner.scan(&dir).unwrap();
        assert_eq!(again.stats.processed, 1);
        assert_eq!(again.artifacts, outcome.artifacts);
    }

    #[test]
    fn test_dependencies_planned_in_dry_run() {
        let project = TempDir::new().unwrap();
        let dir = artifacts_dir(&project);
        fs::write(dir.join("b.jsx"), "import dep from 'pkg';").unwrap();

        let outcome = scanner(project.path()).scan(&dir).unwrap();
        let report = outcome.reconcile.unwrap();
        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].package, "pkg");
        assert_eq!(report.outcomes[0].status, InstallStatus::Planned);
    }
}
