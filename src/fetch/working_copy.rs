//! The ephemeral local checkout.

use anyhow::{Context, Result};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use walkdir::WalkDir;

/// Local checkout owned by this run, deleted when dropped.
#[derive(Debug)]
pub struct WorkingCopy {
    root_path: PathBuf,
}

impl WorkingCopy {
    /// A scratch location under the system temp directory. Nothing is created yet.
    pub fn scratch() -> Self {
        let nanos =
            SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos()).unwrap_or(0);
        let pid = std::process::id();
        Self { root_path: env::temp_dir().join(format!("skill-forge-{pid}-{nanos}")) }
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }

    /// Empty the location so an attempt starts from nothing.
    pub(crate) fn reset(&self) -> Result<()> {
        if self.root_path.exists() {
            fs::remove_dir_all(&self.root_path).with_context(|| {
                format!("Failed clearing working copy: {}", self.root_path.display())
            })?;
        }
        fs::create_dir_all(&self.root_path)
            .with_context(|| format!("Failed creating directory: {}", self.root_path.display()))
    }
}

impl Drop for WorkingCopy {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root_path);
    }
}

/// Delete `.git` from the checkout. Returns whether anything was removed.
///
/// Git marks pack files read-only, which blocks deletion on some platforms;
/// permissions are relaxed and the removal retried once.
pub fn strip_vcs_metadata(root: &Path) -> Result<bool> {
    let git_dir = root.join(".git");
    if !git_dir.exists() {
        return Ok(false);
    }

    if fs::remove_dir_all(&git_dir).is_err() {
        for entry in WalkDir::new(&git_dir).into_iter().filter_map(Result::ok) {
            if let Ok(metadata) = entry.metadata() {
                let mut perms = metadata.permissions();
                #[allow(clippy::permissions_set_readonly_false)]
                perms.set_readonly(false);
                let _ = fs::set_permissions(entry.path(), perms);
            }
        }
        fs::remove_dir_all(&git_dir)
            .with_context(|| format!("Failed removing {}", git_dir.display()))?;
    }

    tracing::debug!("removed {}", git_dir.display());
    Ok(true)
}
