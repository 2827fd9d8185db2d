//! Write-temp-then-rename file output.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Replace `path` with `content` so readers never observe a partial file.
///
/// The temp file lives in the destination directory so the final rename
/// stays on one filesystem.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed creating directory: {}", parent.display()))?;

    let mut tmp = tempfile::Builder::new()
        .prefix(".skill-forge-")
        .suffix(".tmp")
        .tempfile_in(parent)
        .with_context(|| format!("Failed creating temp file in {}", parent.display()))?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed writing {}", path.display()))?;
    Ok(())
}
