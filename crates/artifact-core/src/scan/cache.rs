//! Persisted scan cache keyed by file name
//!
//! Each entry remembers the fingerprint a file had when it was last processed
//! together with everything derived from it, so an unchanged file never has
//! to be opened again.

use super::artifact::Artifact;
use crate::persist::write_atomic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Name of the cache file stored inside the scanned directory
pub const CACHE_FILE_NAME: &str = ".artifact-cache.json";

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to serialize scan cache: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write scan cache {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Cheap proxy for "the file contents may have changed".
///
/// `mtime_secs` is signed so times before the Unix epoch stay distinct;
/// `mtime_nanos` is always the non-negative offset within that second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fingerprint {
    pub mtime_secs: i64,
    pub mtime_nanos: u32,
    pub size: u64,
}

impl Fingerprint {
    /// Capture the fingerprint of a file from its metadata
    pub fn from_metadata(metadata: &Metadata) -> io::Result<Self> {
        Ok(Self::from_parts(metadata.modified()?, metadata.len()))
    }

    pub fn from_parts(modified: SystemTime, size: u64) -> Self {
        let (mtime_secs, mtime_nanos) = match modified.duration_since(UNIX_EPOCH) {
            Ok(after) => (
                i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
                after.subsec_nanos(),
            ),
            Err(e) => {
                let before = e.duration();
                let secs = i64::try_from(before.as_secs()).unwrap_or(i64::MAX);
                match before.subsec_nanos() {
                    0 => (-secs, 0),
                    nanos => (-secs - 1, 1_000_000_000 - nanos),
                }
            }
        };

        Self {
            mtime_secs,
            mtime_nanos,
            size,
        }
    }

    /// Modification time in whole milliseconds since the Unix epoch, clamped
    /// to zero for earlier times
    pub fn modified_millis(&self) -> u64 {
        u64::try_from(self.mtime_secs)
            .map(|secs| secs * 1000 + u64::from(self.mtime_nanos / 1_000_000))
            .unwrap_or(0)
    }
}

/// Everything remembered about one file from its last successful scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub fingerprint: Fingerprint,
    pub dependencies: Vec<String>,
    pub artifact: Artifact,
}

impl CacheEntry {
    /// An entry is reusable only when both modification time and size match exactly
    pub fn is_valid_for(&self, current: &Fingerprint) -> bool {
        self.fingerprint == *current
    }
}

/// In-memory view of the cache file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanCache {
    entries: BTreeMap<String, CacheEntry>,
}

impl ScanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a persisted cache.
    ///
    /// A missing or unreadable file yields an empty cache, which only costs a
    /// full rescan.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Self::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "scan cache unreadable, rescanning everything");
                return Self::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(cache) => cache,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "scan cache corrupt, rescanning everything");
                Self::new()
            }
        }
    }

    /// Overwrite the persisted cache with this mapping
    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        let json = serde_json::to_vec_pretty(self)?;
        write_atomic(path, &json).map_err(|source| CacheError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Look up an entry that is still valid for the given fingerprint
    pub fn lookup(&self, file_name: &str, current: &Fingerprint) -> Option<&CacheEntry> {
        self.entries
            .get(file_name)
            .filter(|entry| entry.is_valid_for(current))
    }

    pub fn get(&self, file_name: &str) -> Option<&CacheEntry> {
        self.entries.get(file_name)
    }

    pub fn insert(&mut self, file_name: String, entry: CacheEntry) {
        self.entries.insert(file_name, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::artifact::ArtifactKind;
    use std::fs;
    use tempfile::TempDir;

    fn entry(size: u64) -> CacheEntry {
        CacheEntry {
            fingerprint: Fingerprint {
                mtime_secs: 100,
                mtime_nanos: 5,
                size,
            },
            dependencies: vec!["react".to_string()],
            artifact: Artifact {
                id: "demo".to_string(),
                name: "Demo".to_string(),
                path: "../claude_artifacts/demo.jsx".to_string(),
                kind: ArtifactKind::React,
                tags: Vec::new(),
                modified_at: 100_000,
            },
        }
    }

    #[test]
    fn test_load_missing_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let cache = ScanCache::load(&temp_dir.path().join(CACHE_FILE_NAME));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_load_corrupt_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CACHE_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        assert!(ScanCache::load(&path).is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CACHE_FILE_NAME);

        let mut cache = ScanCache::new();
        cache.insert("demo.jsx".to_string(), entry(42));
        cache.save(&path).unwrap();

        let loaded = ScanCache::load(&path);
        assert_eq!(loaded, cache);
        assert_eq!(loaded.file_names().collect::<Vec<_>>(), vec!["demo.jsx"]);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gone").join(CACHE_FILE_NAME);

        let err = ScanCache::new().save(&path).unwrap_err();
        assert!(matches!(err, CacheError::Write { .. }));
    }

    #[test]
    fn test_lookup_requires_exact_fingerprint() {
        let mut cache = ScanCache::new();
        cache.insert("demo.jsx".to_string(), entry(42));

        let same = entry(42).fingerprint;
        assert!(cache.lookup("demo.jsx", &same).is_some());

        let resized = Fingerprint { size: 43, ..same };
        assert!(cache.lookup("demo.jsx", &resized).is_none());

        let touched = Fingerprint {
            mtime_nanos: 6,
            ..same
        };
        assert!(cache.lookup("demo.jsx", &touched).is_none());

        assert!(cache.lookup("other.jsx", &same).is_none());
    }

    #[test]
    fn test_fingerprint_from_metadata() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.jsx");
        fs::write(&path, "hello world").unwrap();

        let fp = Fingerprint::from_metadata(&fs::metadata(&path).unwrap()).unwrap();
        assert_eq!(fp.size, 11);
        assert!(fp.mtime_secs > 0);
    }

    #[test]
    fn test_times_before_epoch_stay_distinct() {
        use std::time::Duration;

        let earlier = Fingerprint::from_parts(UNIX_EPOCH - Duration::from_millis(2_500), 7);
        assert_eq!((earlier.mtime_secs, earlier.mtime_nanos), (-3, 500_000_000));

        let later = Fingerprint::from_parts(UNIX_EPOCH - Duration::from_secs(1), 7);
        assert_eq!((later.mtime_secs, later.mtime_nanos), (-1, 0));
        assert_ne!(earlier, later);

        assert_eq!(earlier.modified_millis(), 0);
    }

    #[test]
    fn test_modified_millis() {
        let fp = Fingerprint {
            mtime_secs: 2,
            mtime_nanos: 345_678_901,
            size: 0,
        };
        assert_eq!(fp.modified_millis(), 2_345);
    }
}
