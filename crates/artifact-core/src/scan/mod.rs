//! Artifact scanning
//!
//! [`ArtifactScanner`] walks the artifacts directory, consults the
//! [`ScanCache`], and publishes the paginated manifest.

pub mod artifact;
pub mod cache;
pub mod imports;
pub mod manifest;
pub mod scanner;
pub mod tags;

pub use artifact::{display_name, web_path, Artifact, ArtifactKind};
pub use cache::{CacheEntry, CacheError, Fingerprint, ScanCache, CACHE_FILE_NAME};
pub use imports::{extract_imports, is_external, ExtractedImports, Strategy};
pub use manifest::{load_manifest, write_manifest, ManifestError, ManifestSummary};
pub use scanner::{ArtifactScanner, ScanError, ScanOutcome, ScanSettings, ScanStats};
pub use tags::extract_tags;
