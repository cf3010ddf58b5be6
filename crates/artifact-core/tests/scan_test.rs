//! End-to-end scans of a project directory
//!
//! Each test builds a project in a temp directory and runs real scans against
//! it with a recording installer in place of the package manager.

use artifact_core::deps::{DependencyInstaller, InstallOutcome, InstallStatus};
use artifact_core::scan::{load_manifest, ArtifactKind, CACHE_FILE_NAME};
use artifact_core::{Project, ProjectConfig};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

#[derive(Default)]
struct RecordingInstaller {
    calls: Vec<BTreeSet<String>>,
}

impl DependencyInstaller for RecordingInstaller {
    fn ensure_installed(&mut self, packages: &BTreeSet<String>) -> Vec<InstallOutcome> {
        self.calls.push(packages.clone());
        packages
            .iter()
            .map(|package| InstallOutcome {
                package: package.clone(),
                status: InstallStatus::Installed,
            })
            .collect()
    }
}

fn setup() -> (TempDir, Project) {
    let temp_dir = TempDir::new().unwrap();
    let project = Project::new(temp_dir.path(), ProjectConfig::default());
    project.create_layout().unwrap();
    (temp_dir, project)
}

fn write_artifact(project: &Project, name: &str, content: &str) {
    fs::write(project.paths().artifacts_dir.join(name), content).unwrap();
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

#[test]
fn test_two_artifacts_one_install() {
    let (_temp_dir, project) = setup();
    write_artifact(&project, "a.jsx", "export default () => null;");
    write_artifact(&project, "b.jsx", "import dep from 'pkg'; export default () => null;");

    let mut scanner = project.scanner(RecordingInstaller::default());
    let outcome = scanner.scan(&project.paths().artifacts_dir).unwrap();

    let ids: Vec<&str> = outcome.artifacts.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
    assert!(outcome.artifacts.iter().all(|a| a.kind == ArtifactKind::React));

    let expected: BTreeSet<String> = ["pkg".to_string()].into_iter().collect();
    assert_eq!(outcome.dependencies, expected);
    assert_eq!(scanner.reconciler().installer().calls, vec![expected]);
}

#[test]
fn test_rescan_is_idempotent() {
    let (_temp_dir, project) = setup();
    write_artifact(&project, "chart.jsx", "import { LineChart } from 'recharts';");
    write_artifact(&project, "clock.js", "export const now = () => Date.now();");

    let mut scanner = project.scanner(RecordingInstaller::default());
    let dir = project.paths().artifacts_dir.clone();
    let cache_path = dir.join(CACHE_FILE_NAME);

    let first = scanner.scan(&dir).unwrap();
    let cache_after_first = read(&cache_path);
    let manifest_after_first = load_manifest(&project.paths().public_dir).unwrap();

    let second = scanner.scan(&dir).unwrap();
    assert_eq!(second.stats.processed, 0);
    assert_eq!(second.stats.cached, 2);
    assert_eq!(second.artifacts, first.artifacts);
    assert_eq!(read(&cache_path), cache_after_first);
    assert_eq!(
        load_manifest(&project.paths().public_dir).unwrap(),
        manifest_after_first
    );
}

#[test]
fn test_modified_file_is_reprocessed() {
    let (_temp_dir, project) = setup();
    write_artifact(&project, "a.jsx", "export default () => null;");
    write_artifact(&project, "b.jsx", "export default () => null;");

    let mut scanner = project.scanner(RecordingInstaller::default());
    let dir = project.paths().artifacts_dir.clone();
    scanner.scan(&dir).unwrap();

    // A different size guarantees a different fingerprint
    write_artifact(
        &project,
        "b.jsx",
        "/* @tags: charts */\nimport x from 'd3';\nexport default () => null;",
    );

    let outcome = scanner.scan(&dir).unwrap();
    assert_eq!(outcome.stats.processed, 1);
    assert_eq!(outcome.stats.cached, 1);
    assert_eq!(outcome.artifacts[1].tags, vec!["charts"]);
    assert!(outcome.dependencies.contains("d3"));
}

#[test]
fn test_deleted_file_is_dropped() {
    let (_temp_dir, project) = setup();
    write_artifact(&project, "a.jsx", "export default () => null;");
    write_artifact(&project, "b.jsx", "export default () => null;");

    let mut scanner = project.scanner(RecordingInstaller::default());
    let dir = project.paths().artifacts_dir.clone();
    scanner.scan(&dir).unwrap();

    fs::remove_file(dir.join("b.jsx")).unwrap();
    scanner.scan(&dir).unwrap();

    let cache = read(&dir.join(CACHE_FILE_NAME));
    assert!(cache.contains("a.jsx"));
    assert!(!cache.contains("b.jsx"));

    let manifest = load_manifest(&project.paths().public_dir).unwrap();
    assert_eq!(manifest.len(), 1);
    assert_eq!(manifest[0].id, "a");
}

#[test]
fn test_baseline_dependency_never_installed() {
    let (_temp_dir, project) = setup();
    write_artifact(&project, "a.jsx", "import { clsx } from 'clsx';");

    let mut scanner = project.scanner(RecordingInstaller::default());
    scanner.scan(&project.paths().artifacts_dir).unwrap();

    assert!(scanner.reconciler().installer().calls.is_empty());
}

#[test]
fn test_declared_dependency_not_reinstalled() {
    let (temp_dir, project) = setup();
    fs::write(
        temp_dir.path().join("package.json"),
        r#"{"dependencies": {"recharts": "^2.12.0"}}"#,
    )
    .unwrap();
    write_artifact(&project, "a.jsx", "import { BarChart } from 'recharts';");

    let mut scanner = project.scanner(RecordingInstaller::default());
    scanner.scan(&project.paths().artifacts_dir).unwrap();

    assert!(scanner.reconciler().installer().calls.is_empty());
}

#[test]
fn test_empty_directory() {
    let (_temp_dir, project) = setup();

    let mut scanner = project.scanner(RecordingInstaller::default());
    let outcome = scanner.scan(&project.paths().artifacts_dir).unwrap();

    assert!(outcome.artifacts.is_empty());
    assert!(outcome.reconcile.is_none());
    assert_eq!(outcome.manifest.as_ref().unwrap().total_pages, 0);
    assert_eq!(read(&project.paths().artifacts_dir.join(CACHE_FILE_NAME)).trim(), "{}");
}

#[test]
fn test_fallback_extraction_feeds_reconciliation() {
    let (_temp_dir, project) = setup();
    write_artifact(
        &project,
        "exp.jsx",
        "@experimental\nimport x from 'some-package';\nexport default x;",
    );

    let mut scanner = project.scanner(RecordingInstaller::default());
    let outcome = scanner.scan(&project.paths().artifacts_dir).unwrap();

    let expected: BTreeSet<String> = ["some-package".to_string()].into_iter().collect();
    assert_eq!(outcome.dependencies, expected);
}

#[test]
fn test_manifest_pages() {
    let temp_dir = TempDir::new().unwrap();
    let config = ProjectConfig {
        artifacts_per_page: 2,
        ..ProjectConfig::default()
    };
    let project = Project::new(temp_dir.path(), config);
    project.create_layout().unwrap();
    for name in ["a.js", "b.js", "c.js"] {
        write_artifact(&project, name, "export default 1;");
    }

    let outcome = project.scan(RecordingInstaller::default()).unwrap();
    let summary = outcome.manifest.unwrap();
    assert_eq!(summary.total_pages, 2);

    let public = &project.paths().public_dir;
    assert!(public.join("artifacts_page_1.json").is_file());
    assert!(public.join("artifacts_page_2.json").is_file());
    assert_eq!(load_manifest(public).unwrap().len(), 3);
}
