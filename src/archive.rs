//! Bundle packing
//!
//! Packs a staging directory into a single zip archive for zip deploy.
//! The well-known local secrets file is stripped while packing so it never
//! leaves the machine; an empty staging directory still yields a valid
//! zero-entry archive because bundling is unconditional.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::debug;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::StevedoreResult;

/// Local-only settings file, always stripped from uploaded bundles
pub const LOCAL_SETTINGS_FILE: &str = "local.settings.json";

/// A packed bundle archive
#[derive(Debug, Clone, Serialize)]
pub struct BundleInfo {
    /// Where the archive was written
    pub path: PathBuf,
    /// Number of file entries
    pub entries: usize,
    /// SHA-256 digest of the archive bytes
    pub digest: String,
}

/// Pack the contents of `dir` into a zip archive at `dest`.
///
/// Entries are stored by path relative to `dir` with `/` separators. Any
/// entry whose relative name equals one of `exclude` is omitted.
pub fn pack_directory(dir: &Path, dest: &Path, exclude: &[&str]) -> StevedoreResult<BundleInfo> {
    let file = File::create(dest)?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut entries = 0usize;
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = match entry.path().strip_prefix(dir) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let name = entry_name(rel);
        if exclude.iter().any(|excluded| name == *excluded) {
            debug!("stripping {} from bundle", name);
            continue;
        }
        zip.start_file(name, options.clone())?;
        let mut src = File::open(entry.path())?;
        io::copy(&mut src, &mut zip)?;
        entries += 1;
    }
    zip.finish()?;

    let digest = hash_file(dest)?;
    debug!(
        "packed {} entry(ies) from {} into {} ({})",
        entries,
        dir.display(),
        dest.display(),
        digest
    );

    Ok(BundleInfo {
        path: dest.to_path_buf(),
        entries,
        digest,
    })
}

/// Zip entry name for a relative path, always `/`-separated
fn entry_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Compute the SHA-256 digest of a file
pub fn hash_file(path: &Path) -> StevedoreResult<String> {
    let mut hasher = Sha256::new();
    let mut file = File::open(path)?;
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("sha256:{:x}", hasher.finalize()))
}
