//! Local directory deploy target
//!
//! "Deploys" artifacts by copying them into a local output directory. Backs
//! the `package` command: the artifacts that land here are byte-for-byte
//! what a real deploy would upload (wars individually, bundle with the
//! secrets file already stripped).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::DeployTarget;
use crate::error::DeployError;

/// Deploy target that drops artifacts into a directory on disk
pub struct DirectoryTarget {
    root: PathBuf,
}

impl DirectoryTarget {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The output directory artifacts are copied into
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn receive(&self, artifact: &Path, sub_path: Option<&str>) -> Result<PathBuf, DeployError> {
        let file_name = artifact
            .file_name()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::InvalidInput, "no file name"))?;
        let dest_dir = match sub_path {
            Some(sub) => self.root.join(sub),
            None => self.root.clone(),
        };
        fs::create_dir_all(&dest_dir)?;
        let dest = dest_dir.join(file_name);
        fs::copy(artifact, &dest)?;
        Ok(dest)
    }
}

impl DeployTarget for DirectoryTarget {
    fn zip_deploy(&self, archive: &Path) -> Result<(), DeployError> {
        let dest = self.receive(archive, None)?;
        debug!("bundle packaged to {}", dest.display());
        Ok(())
    }

    fn war_deploy(&self, war: &Path, context_path: Option<&str>) -> Result<(), DeployError> {
        let dest = self.receive(war, context_path)?;
        debug!("war packaged to {}", dest.display());
        Ok(())
    }
}
