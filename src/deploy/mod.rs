//! Publishing staged resources to a deploy target
//!
//! The deploy capability is a trait seam ([`DeployTarget`]) so the publish
//! sequencing can be exercised against fakes; [`KuduClient`] is the HTTP
//! implementation and [`DirectoryTarget`] the local packaging one.
//!
//! Publish order per staging directory is fixed: standalone war artifacts
//! first (each removed from the staging set once pushed), then one
//! unconditional zip-deploy of whatever remains - even a zero-entry bundle,
//! so zip deploy stays the catch-all path for residual content.

mod kudu;
mod local;
mod retry;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

pub use kudu::{user_agent, KuduClient, DEFAULT_TIMEOUT};
pub use local::DirectoryTarget;
pub use retry::{with_retry, DEFAULT_MAX_RETRIES};

use crate::archive::{pack_directory, LOCAL_SETTINGS_FILE};
use crate::error::{DeployError, StevedoreError, StevedoreResult};
use crate::models::{
    ArtifactKind, DeploySummary, PublishReport, ResourceMapping, StagedResource, WarDeployment,
};
use crate::stage::stage_resources;

/// The remote deploy capability.
///
/// Owned by the caller and passed in explicitly; the publisher only invokes
/// it, never constructs it.
pub trait DeployTarget {
    /// Upload a zip bundle as the full application payload
    fn zip_deploy(&self, archive: &Path) -> Result<(), DeployError>;

    /// Upload a standalone deployable unit, bound to a context path
    fn war_deploy(&self, war: &Path, context_path: Option<&str>) -> Result<(), DeployError>;
}

/// Options for a deploy run
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Upper bound on attempts per deploy call
    pub max_attempts: u32,
    /// Stage and pack but make no deploy calls
    pub dry_run: bool,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_RETRIES,
            dry_run: false,
        }
    }
}

/// Stage and publish every declared resource mapping, sequentially.
///
/// The first fatal failure aborts the remaining mappings; there is no
/// partial-success state across a run.
pub fn deploy_resources(
    target: &dyn DeployTarget,
    mappings: &[ResourceMapping],
    options: &DeployOptions,
) -> StevedoreResult<DeploySummary> {
    let staged = stage_resources(mappings)?;

    let mut summary = DeploySummary::default();
    for resource in &staged {
        summary.reports.push(publish(target, resource, options)?);
    }
    Ok(summary)
}

/// Publish one staged resource
pub fn publish(
    target: &dyn DeployTarget,
    staged: &StagedResource,
    options: &DeployOptions,
) -> StevedoreResult<PublishReport> {
    publish_dir(target, staged.path(), staged.target_path.as_deref(), options)
}

/// Publish the contents of a staging directory.
///
/// 1. Fail with [`StevedoreError::StagingEmpty`] if the directory is
///    missing, not a directory, or has zero entries.
/// 2. War-deploy each top-level war file, deleting it from the staging set.
/// 3. Pack the remainder (secrets file stripped) and zip-deploy it.
pub fn publish_dir(
    target: &dyn DeployTarget,
    staging_dir: &Path,
    target_path: Option<&str>,
    options: &DeployOptions,
) -> StevedoreResult<PublishReport> {
    let entries = list_staging(staging_dir)?;

    let mut wars = Vec::new();
    for path in entries {
        if !path.is_file() || ArtifactKind::of(&path) != ArtifactKind::War {
            continue;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("deploying war file: {}", name);
        if !options.dry_run {
            with_retry(
                &format!("war deploy of {name}"),
                options.max_attempts,
                || target.war_deploy(&path, target_path),
            )?;
        }
        fs::remove_file(&path)?;
        wars.push(WarDeployment {
            file: name,
            context_path: target_path.map(str::to_string),
        });
    }

    let bundle_path = sibling_zip(staging_dir);
    let bundle = pack_directory(staging_dir, &bundle_path, &[LOCAL_SETTINGS_FILE])?;
    if !options.dry_run {
        with_retry("zip deploy", options.max_attempts, || {
            target.zip_deploy(&bundle.path)
        })?;
    }

    Ok(PublishReport {
        wars,
        bundle: bundle.path,
        bundle_entries: bundle.entries,
        bundle_digest: bundle.digest,
        target_path: target_path.map(str::to_string),
    })
}

/// Immediate contents of the staging directory, or `StagingEmpty`
fn list_staging(dir: &Path) -> StevedoreResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(StevedoreError::StagingEmpty {
            path: dir.to_path_buf(),
        });
    }
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    if entries.is_empty() {
        return Err(StevedoreError::StagingEmpty {
            path: dir.to_path_buf(),
        });
    }
    entries.sort();
    Ok(entries)
}

/// The bundle lands next to the staging directory as `<dir>.zip`
fn sibling_zip(staging_dir: &Path) -> PathBuf {
    let mut name = OsString::from(staging_dir.as_os_str());
    name.push(".zip");
    PathBuf::from(name)
}

/// Call-recording fake deploy target for tests
#[cfg(test)]
#[derive(Clone, Default)]
pub struct MockDeployTarget {
    pub calls: std::sync::Arc<std::sync::Mutex<Vec<DeployCall>>>,
    /// Number of leading calls that fail with a transient status
    pub fail_first: std::sync::Arc<std::sync::Mutex<u32>>,
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq)]
pub enum DeployCall {
    Zip {
        archive: PathBuf,
    },
    War {
        war: PathBuf,
        context_path: Option<String>,
    },
}

#[cfg(test)]
impl MockDeployTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_first(times: u32) -> Self {
        let mock = Self::default();
        *mock.fail_first.lock().unwrap() = times;
        mock
    }

    pub fn calls(&self) -> Vec<DeployCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: DeployCall) -> Result<(), DeployError> {
        self.calls.lock().unwrap().push(call);
        let mut remaining = self.fail_first.lock().unwrap();
        if *remaining > 0 {
            *remaining -= 1;
            return Err(DeployError::UnexpectedStatus {
                status: 503,
                body: "transient".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
impl DeployTarget for MockDeployTarget {
    fn zip_deploy(&self, archive: &Path) -> Result<(), DeployError> {
        self.record(DeployCall::Zip {
            archive: archive.to_path_buf(),
        })
    }

    fn war_deploy(&self, war: &Path, context_path: Option<&str>) -> Result<(), DeployError> {
        self.record(DeployCall::War {
            war: war.to_path_buf(),
            context_path: context_path.map(str::to_string),
        })
    }
}
