//! Resource staging
//!
//! Copies the files selected by each declared resource mapping into an
//! isolated, uniquely-named temporary directory. Staging is the only step
//! that reads the project tree; everything downstream (packing, deploying)
//! operates on the staging directories alone.

use std::fs;
use std::path::Path;

use ignore::overrides::{Override, OverrideBuilder};
use ignore::WalkBuilder;
use tracing::debug;

use crate::error::{StevedoreError, StevedoreResult};
use crate::models::{ResourceMapping, StagedResource};

/// Prefix marking Stevedore staging directories in the OS temp area
pub const STAGING_PREFIX: &str = "stevedore-";

/// Stage every declared resource mapping into its own temp directory.
///
/// Fails with [`StevedoreError::NoResources`] before any filesystem side
/// effect when no mappings are declared. Mappings are staged in declaration
/// order; the first failure aborts the rest.
pub fn stage_resources(mappings: &[ResourceMapping]) -> StevedoreResult<Vec<StagedResource>> {
    if mappings.is_empty() {
        return Err(StevedoreError::NoResources);
    }

    mappings.iter().map(stage_mapping).collect()
}

/// Stage a single mapping: create a fresh staging directory and copy the
/// selected files into it, preserving relative paths.
pub fn stage_mapping(mapping: &ResourceMapping) -> StevedoreResult<StagedResource> {
    let root = mapping.directory.as_path();
    if !root.is_dir() {
        return Err(StevedoreError::MissingDirectory {
            path: root.to_path_buf(),
        });
    }

    let staging = tempfile::Builder::new().prefix(STAGING_PREFIX).tempdir()?;
    let overrides = build_overrides(root, &mapping.includes, &mapping.excludes)?;

    let mut copied = 0usize;
    let walker = WalkBuilder::new(root)
        .overrides(overrides)
        .standard_filters(false)
        .build();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let rel = match entry.path().strip_prefix(root) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let dest = staging.path().join(rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &dest)?;
        copied += 1;
    }

    debug!(
        "staged {} file(s) from {} into {}",
        copied,
        root.display(),
        staging.path().display()
    );

    Ok(StagedResource::new(
        staging,
        mapping.target_path.clone(),
        copied,
    ))
}

/// Compile a mapping's include/exclude globs into an override matcher.
///
/// Empty includes select everything; excludes are expressed as whitelist
/// negations so they subtract from the selection.
fn build_overrides(
    root: &Path,
    includes: &[String],
    excludes: &[String],
) -> StevedoreResult<Override> {
    let mut builder = OverrideBuilder::new(root);

    if includes.is_empty() {
        add_pattern(&mut builder, "**/*")?;
    }
    for pattern in includes {
        add_pattern(&mut builder, pattern)?;
    }
    for pattern in excludes {
        add_pattern(&mut builder, &format!("!{pattern}"))?;
    }

    builder.build().map_err(|e| StevedoreError::InvalidPattern {
        pattern: String::new(),
        message: e.to_string(),
    })
}

fn add_pattern(builder: &mut OverrideBuilder, pattern: &str) -> StevedoreResult<()> {
    builder
        .add(pattern)
        .map(|_| ())
        .map_err(|e| StevedoreError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}
