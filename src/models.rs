//! Core data models for Stevedore
//!
//! Defines the fundamental data structures used throughout Stevedore:
//! - `ResourceMapping`: a declared source directory with glob selection
//! - `ArtifactKind`: how a staged file is pushed to the platform
//! - `StagedResource`: one staged mapping, owning its temp directory
//! - `PublishReport` / `DeploySummary`: per-mapping and per-run outcomes

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A declared resource mapping: which local files go where on the remote side.
///
/// Read-only during a run. Empty `includes` means everything under
/// `directory`; `excludes` subtracts from the selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceMapping {
    /// Source directory holding the build output to stage
    pub directory: PathBuf,

    /// Glob patterns selecting files to stage (empty = all)
    #[serde(default)]
    pub includes: Vec<String>,

    /// Glob patterns removed from the selection
    #[serde(default)]
    pub excludes: Vec<String>,

    /// Optional sub-path on the remote side (war-deploy context path)
    #[serde(default)]
    pub target_path: Option<String>,
}

impl ResourceMapping {
    /// Create a mapping that stages everything under `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            includes: Vec::new(),
            excludes: Vec::new(),
            target_path: None,
        }
    }

    pub fn with_target_path(mut self, target_path: impl Into<String>) -> Self {
        self.target_path = Some(target_path.into());
        self
    }
}

/// Extensions recognized as standalone deployable units.
///
/// A plain identifier-to-variant table, fixed at compile time; everything
/// not listed here travels in the zip bundle.
const KIND_BY_EXTENSION: &[(&str, ArtifactKind)] = &[("war", ArtifactKind::War)];

/// How a staged file is pushed to the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Pre-packaged deployable unit, pushed individually via war deploy
    War,
    /// Part of the residual zip bundle (catch-all path)
    #[default]
    Bundle,
}

impl ArtifactKind {
    /// Look up the kind for an extension string, case-insensitively
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_ascii_lowercase();
        KIND_BY_EXTENSION
            .iter()
            .find(|(known, _)| *known == ext)
            .map(|(_, kind)| *kind)
            .unwrap_or_default()
    }

    /// Classify a file by its path extension
    pub fn of(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => Self::from_extension(ext),
            None => Self::Bundle,
        }
    }
}

/// One staged resource mapping: an isolated temp directory holding exactly
/// the files destined for one remote target path.
///
/// Owns the temp directory handle; the staging area lives until the value is
/// dropped or [`StagedResource::keep`] detaches it for inspection.
#[derive(Debug)]
pub struct StagedResource {
    dir: TempDir,
    /// The mapping's remote sub-path, carried through to publish
    pub target_path: Option<String>,
    /// Number of files copied in by the stager
    pub file_count: usize,
}

impl StagedResource {
    pub fn new(dir: TempDir, target_path: Option<String>, file_count: usize) -> Self {
        Self {
            dir,
            target_path,
            file_count,
        }
    }

    /// Path of the staging directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Detach the staging directory from cleanup and return its path
    pub fn keep(self) -> PathBuf {
        self.dir.keep()
    }
}

/// A war file pushed individually during publish
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WarDeployment {
    /// File name of the deployed war
    pub file: String,
    /// Context path it was bound to, if any
    pub context_path: Option<String>,
}

/// Outcome of publishing a single staging directory
#[derive(Debug, Clone, Serialize)]
pub struct PublishReport {
    /// Wars deployed individually, in processing order
    pub wars: Vec<WarDeployment>,
    /// Path of the packed bundle archive
    pub bundle: PathBuf,
    /// Number of file entries in the bundle (zero-entry bundles still deploy)
    pub bundle_entries: usize,
    /// SHA-256 digest of the bundle archive
    pub bundle_digest: String,
    /// Remote sub-path the mapping was bound to
    pub target_path: Option<String>,
}

/// Aggregate outcome of a whole deploy run
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeploySummary {
    /// One report per resource mapping, in declaration order
    pub reports: Vec<PublishReport>,
}

impl DeploySummary {
    /// Total wars deployed across all mappings
    pub fn war_count(&self) -> usize {
        self.reports.iter().map(|r| r.wars.len()).sum()
    }

    /// Total bundles deployed (one per mapping)
    pub fn bundle_count(&self) -> usize {
        self.reports.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_kind_war_extension() {
        assert_eq!(ArtifactKind::from_extension("war"), ArtifactKind::War);
    }

    #[test]
    fn test_artifact_kind_matches_case_insensitively() {
        assert_eq!(ArtifactKind::from_extension("WAR"), ArtifactKind::War);
        assert_eq!(ArtifactKind::of(Path::new("ROOT.War")), ArtifactKind::War);
    }

    #[test]
    fn test_artifact_kind_defaults_to_bundle() {
        assert_eq!(ArtifactKind::from_extension("jar"), ArtifactKind::Bundle);
        assert_eq!(ArtifactKind::of(Path::new("index.html")), ArtifactKind::Bundle);
        assert_eq!(ArtifactKind::of(Path::new("Makefile")), ArtifactKind::Bundle);
    }

    #[test]
    fn test_resource_mapping_deserialize_minimal() {
        let mapping: ResourceMapping = toml::from_str("directory = \"target/dist\"").unwrap();

        assert_eq!(mapping.directory, PathBuf::from("target/dist"));
        assert!(mapping.includes.is_empty());
        assert!(mapping.excludes.is_empty());
        assert!(mapping.target_path.is_none());
    }

    #[test]
    fn test_resource_mapping_deserialize_full() {
        let toml = r#"
directory = "target/dist"
includes = ["**/*.html", "**/*.js"]
excludes = ["*.map"]
target_path = "api"
"#;
        let mapping: ResourceMapping = toml::from_str(toml).unwrap();

        assert_eq!(mapping.includes.len(), 2);
        assert_eq!(mapping.excludes, vec!["*.map".to_string()]);
        assert_eq!(mapping.target_path, Some("api".to_string()));
    }

    #[test]
    fn test_staged_resource_exposes_path() {
        let dir = tempfile::tempdir().unwrap();
        let expected = dir.path().to_path_buf();
        let staged = StagedResource::new(dir, Some("api".to_string()), 2);

        assert_eq!(staged.path(), expected);
        assert_eq!(staged.target_path.as_deref(), Some("api"));
        assert_eq!(staged.file_count, 2);
    }

    #[test]
    fn test_deploy_summary_counts() {
        let mut summary = DeploySummary::default();
        summary.reports.push(PublishReport {
            wars: vec![WarDeployment {
                file: "app.war".to_string(),
                context_path: None,
            }],
            bundle: PathBuf::from("/tmp/a.zip"),
            bundle_entries: 3,
            bundle_digest: "sha256:0".to_string(),
            target_path: None,
        });
        summary.reports.push(PublishReport {
            wars: Vec::new(),
            bundle: PathBuf::from("/tmp/b.zip"),
            bundle_entries: 0,
            bundle_digest: "sha256:1".to_string(),
            target_path: Some("api".to_string()),
        });

        assert_eq!(summary.war_count(), 1);
        assert_eq!(summary.bundle_count(), 2);
    }
}
